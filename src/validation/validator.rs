//! Orchestration of the prompt and image rules into a single verdict

use log::{debug, info};

use super::errors::ValidationError;
use super::fetcher::{get_image_info, ImageFetcher};
use super::options::ValidationOptions;
use super::types::{Code, FieldStatus, ImageInfo, ImageMeta, RuleResult, Status, Verdict};
use super::validators::{image as image_validators, text as text_validators, url as url_utils};
use super::{NO_INPUT_MESSAGE, NO_VALID_URL_MESSAGE};

/// Runs the fixed rule battery against a prompt and a list of image URLs.
///
/// The validator holds no state besides its fetcher, so calling
/// [`Validator::validate`] twice with the same inputs gives the same verdict.
pub struct Validator<F: ImageFetcher> {
    fetcher: F,
}

/// The first failure recorded wins. The prompt branch runs first, so a prompt
/// failure always takes priority over an image failure.
struct Aggregate {
    code: Code,
    message: String,
}

impl Aggregate {
    fn new() -> Self {
        Self {
            code: Code::Success,
            message: String::new(),
        }
    }

    fn record(&mut self, failure: &RuleResult) {
        if self.code.is_success() {
            self.code = failure.code;
            self.message = failure.message.clone();
        }
    }
}

impl RuleResult {
    fn into_result(self) -> Result<(), RuleResult> {
        if self.passed {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<F: ImageFetcher> Validator<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Validates the inputs and renders the verdict.
    ///
    /// Returns `Err(ValidationError::Rejected)` instead of an error verdict when
    /// `options.trigger_system_error` is set. The no-input verdict is always
    /// returned as `Ok`.
    pub fn validate(
        &self,
        prompt_text: &str,
        image_urls: &str,
        options: &ValidationOptions,
    ) -> Result<Verdict, ValidationError> {
        let has_prompt = !prompt_text.trim().is_empty();
        let has_images = !image_urls.trim().is_empty();

        // Missing input is answered directly and never signalled
        if !has_prompt && !has_images {
            info!("Validation finished with {}: no input", Code::NoInput);
            return Ok(Verdict {
                status_code: Code::NoInput,
                status: Status::Error,
                error_message: NO_INPUT_MESSAGE.to_string(),
                image_urls: String::new(),
                prompt_text: String::new(),
                prompt_status: FieldStatus::NoInput,
                image_status: FieldStatus::NoInput,
            });
        }

        let verdict = {
            let mut aggregate = Aggregate::new();

            let prompt_status = if has_prompt {
                self.check_prompt(prompt_text, options, &mut aggregate)
            } else {
                FieldStatus::NoInput
            };

            let (image_status, processed_urls) = if has_images {
                self.check_images(image_urls, options, &mut aggregate)
            } else {
                (FieldStatus::NoInput, Vec::new())
            };

            let image_urls = match (has_images, processed_urls.is_empty()) {
                (true, false) => processed_urls.join("\n"),
                (true, true) => image_urls.to_string(),
                (false, _) => String::new(),
            };

            Verdict {
                status_code: aggregate.code,
                status: if aggregate.code.is_success() {
                    Status::Success
                } else {
                    Status::Error
                },
                error_message: aggregate.message,
                image_urls,
                prompt_text: prompt_text.to_string(),
                prompt_status,
                image_status,
            }
        };

        info!(
            "Validation finished with {} (prompt: {:?}, images: {:?})",
            verdict.status_code, verdict.prompt_status, verdict.image_status
        );

        if options.trigger_system_error && !verdict.is_success() {
            return Err(ValidationError::Rejected {
                code: verdict.status_code,
                message: verdict.error_message,
            });
        }
        Ok(verdict)
    }

    /// Banned words, then character count, then language. Stops at the first failure.
    fn check_prompt(
        &self,
        prompt_text: &str,
        options: &ValidationOptions,
        aggregate: &mut Aggregate,
    ) -> FieldStatus {
        let rules: [(fn(&str, &str) -> RuleResult, &str); 3] = [
            (text_validators::validate_banned_words, &options.banned_words),
            (text_validators::validate_char_count, &options.char_count_limit),
            (text_validators::validate_language, &options.supported_languages),
        ];

        let failure = rules
            .iter()
            .map(|(rule, config)| rule(prompt_text, *config))
            .find(|result| !result.passed);

        match failure {
            Some(failure) => {
                debug!("Prompt rejected with {}: {}", failure.code, failure.message);
                aggregate.record(&failure);
                FieldStatus::Failed
            }
            None => FieldStatus::Success,
        }
    }

    /// Returns the image field status and the processed URL list
    fn check_images(
        &self,
        image_urls: &str,
        options: &ValidationOptions,
        aggregate: &mut Aggregate,
    ) -> (FieldStatus, Vec<String>) {
        let urls = url_utils::parse_url_list(image_urls);
        if urls.is_empty() {
            aggregate.record(&RuleResult::fail(Code::NoValidUrl, NO_VALID_URL_MESSAGE));
            return (FieldStatus::Failed, urls);
        }

        let processed = url_utils::prepare_urls(&urls, options.url_encoding);
        let status = match self.check_image_rules(&processed, options) {
            Ok(()) => FieldStatus::Success,
            Err(failure) => {
                debug!("Images rejected with {}: {}", failure.code, failure.message);
                aggregate.record(&failure);
                FieldStatus::Failed
            }
        };
        (status, processed)
    }

    fn check_image_rules(&self, urls: &[String], options: &ValidationOptions) -> Result<(), RuleResult> {
        image_validators::validate_image_count(urls.len(), &options.image_count_limit)
            .into_result()?;

        let images = self.fetch_all(urls)?;

        image_validators::validate_total_size(&images, &options.total_size_limit).into_result()?;

        let rules: [&dyn Fn(&ImageMeta) -> RuleResult; 7] = [
            &|img: &ImageMeta| image_validators::validate_single_size(img.size_kb, &options.single_size_limit),
            &|img: &ImageMeta| image_validators::validate_long_edge(img, &options.long_edge_limit),
            &|img: &ImageMeta| image_validators::validate_short_edge(img, &options.short_edge_limit),
            &|img: &ImageMeta| image_validators::validate_aspect_ratio(img, &options.aspect_ratio_limit),
            &|img: &ImageMeta| image_validators::validate_fixed_ratio(img, &options.fixed_ratios),
            &|img: &ImageMeta| image_validators::validate_image_format(&img.format, &options.image_formats),
            &|img: &ImageMeta| {
                image_validators::validate_transparency(img.has_transparency, options.transparency_check)
            },
        ];

        // A failing image also ends the pass for every image after it
        for (index, img) in images.iter().enumerate() {
            if let Some(failure) = rules.iter().map(|rule| rule(img)).find(|r| !r.passed) {
                return Err(RuleResult::fail(
                    failure.code,
                    format!("image {}: {}", index + 1, failure.message),
                ));
            }
        }
        Ok(())
    }

    /// Fetches every URL in order, stopping at the first unreadable one
    fn fetch_all(&self, urls: &[String]) -> Result<Vec<ImageMeta>, RuleResult> {
        let mut images = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            match get_image_info(&self.fetcher, url) {
                ImageInfo::Readable(meta) => images.push(meta),
                ImageInfo::Unreadable { error, .. } => {
                    return Err(RuleResult::fail(
                        Code::ImageUnreadable,
                        format!("image {} could not be read: {}", index + 1, error),
                    ));
                }
            }
        }
        Ok(images)
    }
}
