use super::listener::{ChannelListener, Status};

type StatusHook<'a, T> = Box<dyn Fn(Status, &mut T) + 'a>;
type CloseHook<'a, T> = Box<dyn Fn(&mut T) + 'a>;

/// Listener assembled from closures. Hooks that are not set do nothing.
///
/// ```
/// use chanwatch::core::{ChannelListener, FnListener};
///
/// let listener = FnListener::new()
///     .on_read_fn(|status, bytes: &mut Vec<i64>| bytes.push(status))
///     .on_close_fn(|bytes: &mut Vec<i64>| bytes.clear());
///
/// let mut seen = Vec::new();
/// listener.on_read(3, &mut seen);
/// assert_eq!(seen, vec![3]);
/// ```
pub struct FnListener<'a, T: ?Sized> {
    connect: Option<StatusHook<'a, T>>,
    read: Option<StatusHook<'a, T>>,
    write: Option<StatusHook<'a, T>>,
    close: Option<CloseHook<'a, T>>,
}

impl<'a, T: ?Sized> FnListener<'a, T> {
    pub fn new() -> Self {
        Self {
            connect: None,
            read: None,
            write: None,
            close: None,
        }
    }

    pub fn on_connect_fn(mut self, hook: impl Fn(Status, &mut T) + 'a) -> Self {
        self.connect = Some(Box::new(hook));
        self
    }

    pub fn on_read_fn(mut self, hook: impl Fn(Status, &mut T) + 'a) -> Self {
        self.read = Some(Box::new(hook));
        self
    }

    pub fn on_write_fn(mut self, hook: impl Fn(Status, &mut T) + 'a) -> Self {
        self.write = Some(Box::new(hook));
        self
    }

    pub fn on_close_fn(mut self, hook: impl Fn(&mut T) + 'a) -> Self {
        self.close = Some(Box::new(hook));
        self
    }
}

impl<T: ?Sized> Default for FnListener<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> ChannelListener<T> for FnListener<'_, T> {
    fn on_close(&self, data: &mut T) {
        if let Some(hook) = &self.close {
            hook(data);
        }
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        if let Some(hook) = &self.connect {
            hook(status, data);
        }
    }

    fn on_read(&self, status: Status, data: &mut T) {
        if let Some(hook) = &self.read {
            hook(status, data);
        }
    }

    fn on_write(&self, status: Status, data: &mut T) {
        if let Some(hook) = &self.write {
            hook(status, data);
        }
    }
}
