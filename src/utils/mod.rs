pub mod error;
pub mod formats;
pub mod fs;

pub use error::{CompressorError, CompressorResult};
pub use formats::{is_supported_image, ALLOWED_INPUT_EXTENSIONS};
pub use fs::{file_name_of, file_size, format_file_size};
