//! Pass orchestration: radius → measurement label → tolerance bounds.

use image::GrayImage;

use crate::extract::{extract, ExtractConfig, ExtractError, OcrEngine};
use crate::passes::{apply_patches, bounds, measurement, radius};
use crate::predicates::PredicateConfig;
use crate::Detection;

/// End-to-end configuration: extraction plus predicate tuning.
#[derive(Debug, Clone, Default)]
pub struct ProcessConfig {
    pub extract: ExtractConfig,
    pub predicates: PredicateConfig,
}

/// Run the three classification passes in their fixed order.
///
/// Each pass reads an immutable snapshot and returns patches; a pass's
/// patches are applied in emission order before the next pass runs.
/// Overlapping matches therefore resolve last-writer-wins, and repeated
/// runs over the same input are deterministic.
pub fn annotate(detections: &mut [Detection], config: &PredicateConfig) {
    let patches = radius::radius_patches(detections);
    tracing::debug!("radius pass: {} matches", patches.len());
    apply_patches(detections, patches);

    let patches = measurement::measurement_patches(detections, config);
    tracing::debug!("measurement pass: {} matches", patches.len());
    apply_patches(detections, patches);

    let patches = bounds::bound_patches(detections, config);
    tracing::debug!("bound pass: {} matches", patches.len());
    apply_patches(detections, patches);

    let n_radius = detections.iter().filter(|d| d.attributes.is_radius).count();
    let n_labeled = detections
        .iter()
        .filter(|d| d.attributes.required_measurement.as_label().is_some())
        .count();
    let n_bounded = detections
        .iter()
        .filter(|d| d.attributes.lower_bound.is_some())
        .count();
    tracing::info!(
        "annotated {} detections: {} radius, {} labeled, {} with bounds",
        detections.len(),
        n_radius,
        n_labeled,
        n_bounded,
    );
}

/// The full path from image to annotated detections: extract through the
/// engine, then annotate in place.
pub fn process_image<E>(
    engine: &mut E,
    image: &GrayImage,
    config: &ProcessConfig,
) -> Result<Vec<Detection>, ExtractError>
where
    E: OcrEngine + ?Sized,
{
    let mut detections = extract(engine, image, &config.extract)?;
    annotate(&mut detections, &config.predicates);
    Ok(detections)
}
