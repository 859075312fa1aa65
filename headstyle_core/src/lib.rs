pub mod error;
pub mod log;

pub use error::{HeadstyleError, HeadstyleResult};

pub mod prelude {
    pub use crate::log::*;
    pub use crate::{HeadstyleError, HeadstyleResult};
}
