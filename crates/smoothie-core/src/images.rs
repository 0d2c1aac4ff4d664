//! Bundled image manifest and image-source resolution

use crate::types::BuildMode;

/// Smoothie id to bundled asset, relative to the widget's asset root
pub const BUNDLED_IMAGES: &[(&str, &str)] = &[
    ("blue_moon", "assets/BlueMoon.jpg"),
    ("great_breakfast", "assets/GreatBreakfast.jpg"),
    ("muscle_up", "assets/MuscleUp.jpg"),
    ("blueberry_bliss", "assets/BlueberryBliss.jpg"),
    ("chocolate_supreme", "assets/ChocolateSupreme.jpg"),
    ("detox_greens", "assets/DetoxGreens.jpg"),
    ("flax_master", "assets/FlaxMaster.jpg"),
    ("power_shred", "assets/PowerShred.png"),
    ("slim_down", "assets/SlimDown.jpg"),
    ("original_fit_frappe", "assets/OriginalFitFrappe.jpg"),
    ("mocha_fit_frappe", "assets/MochaFitFrapee.jpg"),
    ("matcha_fit_frappe", "assets/MatchaFitFrappe.jpg"),
    ("protein_cold_foam_coffee", "assets/ProteinColdFoamCoffee.jpg"),
    ("brain_alchemy_latte", "assets/BrainAlchemyLatte.jpg"),
    ("collagen_mocha_latte", "assets/CollagenMochaLatte.jpg"),
    ("golden_immunity_latte", "assets/GoldenImmunityLate.jpg"),
    ("mindful_matcha_latte", "assets/MindfulMatchaLatte.jpg"),
    ("superfood_coffee", "assets/SuperfoodCoffee.jpg"),
];

pub fn bundled_image(id: &str) -> Option<&'static str> {
    BUNDLED_IMAGES
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, path)| *path)
}

/// Pick the image source for a reply.
///
/// Precedence: bundled asset for `id`, then an absolute `image_path`, then
/// `/images/<basename>` in production, then `api_base + image_path`.
pub fn resolve_image_source(
    id: Option<&str>,
    image_path: Option<&str>,
    api_base: &str,
    mode: BuildMode,
) -> Option<String> {
    if let Some(bundled) = id.and_then(bundled_image) {
        return Some(bundled.to_string());
    }

    let path = image_path.map(str::trim).filter(|p| !p.is_empty())?;

    if path.starts_with("http") {
        return Some(path.to_string());
    }

    if mode.is_production() {
        let name = path.rsplit('/').next().filter(|n| !n.is_empty())?;
        return Some(format!("/images/{name}"));
    }

    Some(format!("{api_base}{path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const API: &str = "http://localhost:8000";

    #[test]
    fn test_bundled_image_lookup() {
        assert_eq!(bundled_image("power_shred"), Some("assets/PowerShred.png"));
        assert_eq!(
            bundled_image("golden_immunity_latte"),
            Some("assets/GoldenImmunityLate.jpg")
        );
        assert_eq!(bundled_image("kale_storm"), None);
    }

    #[test]
    fn test_bundled_wins_over_image_path() {
        let src = resolve_image_source(
            Some("blue_moon"),
            Some("https://cdn.example.com/x.jpg"),
            API,
            BuildMode::Production,
        );
        assert_eq!(src.as_deref(), Some("assets/BlueMoon.jpg"));
    }

    #[test]
    fn test_absolute_url_passthrough() {
        let src = resolve_image_source(
            Some("kale_storm"),
            Some("https://cdn.example.com/kale.jpg"),
            API,
            BuildMode::Development,
        );
        assert_eq!(src.as_deref(), Some("https://cdn.example.com/kale.jpg"));
    }

    #[test]
    fn test_production_uses_images_dir() {
        let src = resolve_image_source(
            None,
            Some("/static/menu/kale.jpg"),
            API,
            BuildMode::Production,
        );
        assert_eq!(src.as_deref(), Some("/images/kale.jpg"));
    }

    #[test]
    fn test_production_trailing_slash_yields_none() {
        let src = resolve_image_source(None, Some("/static/menu/"), API, BuildMode::Production);
        assert_eq!(src, None);
    }

    #[test]
    fn test_development_prefixes_api_base() {
        let src = resolve_image_source(None, Some("/static/kale.jpg"), API, BuildMode::Development);
        assert_eq!(src.as_deref(), Some("http://localhost:8000/static/kale.jpg"));
    }

    #[test]
    fn test_no_id_no_path() {
        assert_eq!(resolve_image_source(None, None, API, BuildMode::Development), None);
        assert_eq!(
            resolve_image_source(None, Some("  "), API, BuildMode::Development),
            None
        );
    }
}
