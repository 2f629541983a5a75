pub mod activist;
pub mod level;
pub mod status;

pub use activist::{
    ActivistConnectionRow, ActivistEventRow, ActivistExtraRow, ActivistInput,
    ActivistMembershipRow, ActivistRow, ActivistView, BasicActivistRow,
};
pub use level::ActivistLevel;
pub use status::Status;
