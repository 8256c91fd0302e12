use anyhow::anyhow;

/// Whether a fake driven port behaves as if its backing system is reachable
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Fails the way a real adapter would when the backing system can't be reached
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not connect to the document store!")),
        }
    }
}

/// Records the arguments of every call made to a faked async trait method and hands back a
/// preconfigured result. Mocking crates don't cope well with async trait methods, so mock
/// driving ports are built from these, one per method, and wrapped in a [std::sync::Mutex].
///
/// * [Args] is whatever should be captured from a single call
/// * [Ret] is the type handed back to the caller
///
/// ```ignore
/// struct MockGreeter {
///     greet_result: FakeImplementation<String, Result<String, GreetError>>,
/// }
///
/// impl Greeter for Mutex<MockGreeter> {
///     async fn greet(&self, name: &str) -> Result<String, GreetError> {
///         let mut locked_self = self.lock().unwrap();
///         locked_self.greet_result.save_arguments(name.to_owned());
///         locked_self.greet_result.return_value_result()
///     }
/// }
/// ```
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

    /// Saves arguments from a single invocation
    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Every set of arguments this fake has been invoked with, oldest first
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Success, Fail> FakeImplementation<Args, Result<Success, Fail>>
where
    Success: Clone,
    Fail: Clone,
{
    /// Sets the result handed back on every invocation
    pub fn set_returned_result(&mut self, return_value: Result<Success, Fail>) {
        self.return_value = Some(return_value);
    }

    /// Clones out the configured result. Panics if nothing was configured, since that means the
    /// test didn't expect the call.
    pub fn return_value_result(&self) -> Result<Success, Fail> {
        match self.return_value {
            Some(ref configured) => configured.clone(),
            None => panic!("Tried to return from a function where the return value wasn't set!"),
        }
    }
}

impl<Args, Success> FakeImplementation<Args, anyhow::Result<Success>>
where
    Success: Clone,
{
    /// Sets the result handed back on every invocation. [anyhow::Error] can't be cloned, so
    /// errors are stored and replayed by their message.
    pub fn set_returned_anyhow(&mut self, return_value: anyhow::Result<Success>) {
        self.return_value = Some(return_value.map_err(|err| anyhow!(format!("{err}"))));
    }

    /// Replays the configured [anyhow::Result]
    pub fn return_value_anyhow(&self) -> anyhow::Result<Success> {
        match self.return_value {
            None => panic!("Tried to return from a function where the value wasn't set!"),
            Some(Ok(ref ok_result)) => Ok(ok_result.clone()),
            Some(Err(ref err)) => Err(anyhow!(format!("{err}"))),
        }
    }
}
