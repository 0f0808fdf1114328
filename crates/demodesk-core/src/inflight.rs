//! Drop guard for the widgets' `loading` flags.

/// Holds a `loading` flag up while a request is outstanding.
///
/// The flag is cleared when the guard drops, which also happens when the
/// future driving the request is cancelled before the backend answers.
pub(crate) struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    pub(crate) fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
