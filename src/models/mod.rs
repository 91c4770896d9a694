pub mod calendar;
pub mod session;
pub mod settings;

pub use calendar::parse_calendar_date;
pub use session::{find_session, Session, SessionStatus};
pub use settings::{ProgramSettings, SettingsError};
