use crate::app::event::ServerId;

/// Work the key handler hands back to the main loop because it needs
/// async or application-wide resources.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Connect { server_id: ServerId },
    SaveSettings,
    Quit { message: Option<String> },
}
