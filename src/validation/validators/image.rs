//! Image-specific validation functions

use crate::validation::errors::LimitError;
use crate::validation::limits::{Bound, LimitRange, RatioList};
use crate::validation::options::TransparencyCheck;
use crate::validation::types::{Code, ImageMeta, RuleResult};

/// Shared shape of every `"min,max"` rule: parse, compare, describe.
/// `describe` receives the violated bound and its limit value.
fn check_range<F>(
    limit: Result<Option<LimitRange>, LimitError>,
    option: &str,
    value: f64,
    (below, above): (Code, Code),
    describe: F,
) -> RuleResult
where
    F: Fn(Bound, f64) -> String,
{
    let range = match limit {
        Ok(Some(range)) => range,
        Ok(None) => return RuleResult::pass(),
        Err(e) => return RuleResult::fail(Code::InvalidLimit, format!("invalid {}: {}", option, e)),
    };

    match range.check(value) {
        Bound::Within => RuleResult::pass(),
        bound @ Bound::BelowMin => RuleResult::fail(below, describe(bound, range.min)),
        bound @ Bound::AboveMax => RuleResult::fail(above, describe(bound, range.max)),
    }
}

pub fn validate_image_count(count: usize, limit: &str) -> RuleResult {
    check_range(
        LimitRange::parse_int(limit),
        "image_count_limit",
        count as f64,
        (Code::TooFewImages, Code::TooManyImages),
        |bound, limit| match bound {
            Bound::BelowMin => format!("too few images: {}, at least {} required", count, limit),
            _ => format!("too many images: {}, at most {} allowed", count, limit),
        },
    )
}

/// Sum of the sizes of all readable images, in KB
pub fn validate_total_size(images: &[ImageMeta], limit: &str) -> RuleResult {
    let total: f64 = images.iter().map(|img| img.size_kb).sum();
    check_range(
        LimitRange::parse_int(limit),
        "total_size_limit",
        total,
        (Code::TotalSizeTooSmall, Code::TotalSizeTooLarge),
        |bound, limit| match bound {
            Bound::BelowMin => format!(
                "total image size too small: {}KB, at least {}KB required",
                total.trunc(),
                limit
            ),
            _ => format!(
                "total image size too large: {}KB, at most {}KB allowed",
                total.trunc(),
                limit
            ),
        },
    )
}

pub fn validate_single_size(size_kb: f64, limit: &str) -> RuleResult {
    check_range(
        LimitRange::parse_int(limit),
        "single_size_limit",
        size_kb,
        (Code::ImageTooSmall, Code::ImageTooLarge),
        |bound, limit| match bound {
            Bound::BelowMin => format!(
                "image too small: {}KB, at least {}KB required",
                size_kb.trunc(),
                limit
            ),
            _ => format!(
                "image too large: {}KB, at most {}KB allowed",
                size_kb.trunc(),
                limit
            ),
        },
    )
}

pub fn validate_long_edge(image: &ImageMeta, limit: &str) -> RuleResult {
    let edge = image.long_edge();
    check_range(
        LimitRange::parse_int(limit),
        "long_edge_limit",
        edge as f64,
        (Code::LongEdgeTooShort, Code::LongEdgeTooLong),
        |bound, limit| match bound {
            Bound::BelowMin => format!("long edge too short: {}px, at least {}px required", edge, limit),
            _ => format!("long edge too long: {}px, at most {}px allowed", edge, limit),
        },
    )
}

pub fn validate_short_edge(image: &ImageMeta, limit: &str) -> RuleResult {
    let edge = image.short_edge();
    check_range(
        LimitRange::parse_int(limit),
        "short_edge_limit",
        edge as f64,
        (Code::ShortEdgeTooShort, Code::ShortEdgeTooLong),
        |bound, limit| match bound {
            Bound::BelowMin => format!("short edge too short: {}px, at least {}px required", edge, limit),
            _ => format!("short edge too long: {}px, at most {}px allowed", edge, limit),
        },
    )
}

/// Free aspect ratio: short edge over long edge, always within (0, 1]
pub fn validate_aspect_ratio(image: &ImageMeta, limit: &str) -> RuleResult {
    let long = image.long_edge();
    let ratio = if long == 0 {
        0.0
    } else {
        image.short_edge() as f64 / long as f64
    };

    check_range(
        LimitRange::parse_float(limit),
        "aspect_ratio_limit",
        ratio,
        (Code::RatioTooLow, Code::RatioTooHigh),
        |bound, limit| match bound {
            Bound::BelowMin => format!("aspect ratio too low: {:.2}, at least {}", ratio, limit),
            _ => format!("aspect ratio too high: {:.2}, at most {}", ratio, limit),
        },
    )
}

pub fn validate_fixed_ratio(image: &ImageMeta, limit: &str) -> RuleResult {
    let ratios = match RatioList::parse(limit) {
        Ok(Some(ratios)) => ratios,
        Ok(None) => return RuleResult::pass(),
        Err(e) => return RuleResult::fail(Code::InvalidLimit, format!("invalid fixed_ratios: {}", e)),
    };

    if ratios.matches(image.width, image.height) {
        return RuleResult::pass();
    }

    let current = image.width as f64 / image.height.max(1) as f64;
    RuleResult::fail(
        Code::FixedRatioMismatch,
        format!(
            "aspect ratio {}:{} (about {:.2}) does not match {}",
            image.width, image.height, current, limit
        ),
    )
}

/// `jpg` and `jpeg` are interchangeable; an empty allow-list passes
pub fn validate_image_format(format: &str, allowed: &str) -> RuleResult {
    if allowed.trim().is_empty() {
        return RuleResult::pass();
    }

    let format = format.to_lowercase();
    let is_allowed = allowed
        .split(',')
        .map(|f| f.trim().to_lowercase())
        .any(|f| f == format || (is_jpeg(&f) && is_jpeg(&format)));

    if is_allowed {
        RuleResult::pass()
    } else {
        RuleResult::fail(
            Code::FormatNotAllowed,
            format!("unsupported image format {}, allowed: {}", format, allowed),
        )
    }
}

fn is_jpeg(format: &str) -> bool {
    matches!(format, "jpg" | "jpeg")
}

pub fn validate_transparency(has_transparency: bool, check: TransparencyCheck) -> RuleResult {
    match check {
        TransparencyCheck::Disabled => RuleResult::pass(),
        TransparencyCheck::OnlyTransparent if !has_transparency => RuleResult::fail(
            Code::TransparencyViolation,
            "image must have a transparent background",
        ),
        TransparencyCheck::NoTransparent if has_transparency => RuleResult::fail(
            Code::TransparencyViolation,
            "image must not have a transparent background",
        ),
        _ => RuleResult::pass(),
    }
}
