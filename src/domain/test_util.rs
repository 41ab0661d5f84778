use anyhow::anyhow;

/// Whether a fake driven port should behave as if its backing store is reachable.
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Return an error if connectivity is in a "disconnected" state
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not reach the todo store!")),
        }
    }
}

/// Records the arguments of every call made to a faked async trait method and hands back a
/// canned result. Trait mocking crates struggle with native async trait methods, so the
/// mocks in this crate wrap one of these per method behind a [std::sync::Mutex].
///
/// * `Args` is whatever the fake captures from a single call
/// * `Ret` is the canned return value
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Every set of arguments this fake has been invoked with, oldest first
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }

    /// Set the value handed back on every subsequent call
    pub fn set_return_value(&mut self, return_value: Ret) {
        self.return_value = Some(return_value)
    }
}

impl<Args, Ret: Clone> FakeImplementation<Args, Ret> {
    /// Retrieve the configured return value. Panics if the test never configured one.
    pub fn return_value(&self) -> Ret {
        match self.return_value {
            None => panic!("Tried to return from a faked function whose return value wasn't set!"),
            Some(ref ret_val) => ret_val.clone(),
        }
    }
}
