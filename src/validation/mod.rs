//! Root module for the validation system
//! This file exposes the public API and re-exports commonly used types

mod errors;
mod fetcher;
mod limits;
mod options;
mod types;
mod validator;
pub mod validators;

pub use errors::{FetchError, LimitError, ValidationError};
pub use fetcher::{get_image_info, inspect_image, DecodedImage, HttpImageFetcher, ImageFetcher};
pub use limits::{Bound, LimitRange, RatioList, RATIO_TOLERANCE};
pub use options::{TransparencyCheck, ValidationOptions};
pub use types::{Code, FieldStatus, ImageInfo, ImageMeta, RuleResult, Status, Verdict};
pub use validator::Validator;

// Messages for failures that are not produced by a single rule
pub const NO_INPUT_MESSAGE: &str = "at least one of prompt_text or image_urls required";
pub const NO_VALID_URL_MESSAGE: &str = "no valid image URL found";
