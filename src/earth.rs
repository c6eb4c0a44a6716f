//! Google Earth Web deep links for the canyon map.
//!
//! Earth's web client accepts a camera spec in the URL fragment
//! (`@lat,lon,altitude,distance,tilt,heading,terrain,rotation`) and an
//! optional percent-encoded KML document. We generate per-rapid links and a
//! full-canyon tour with one placemark per coordinate-bearing rapid.

use crate::models::Rapid;

// ---

/// Camera over the whole canyon, used whenever coordinates are unavailable.
const CANYON_OVERVIEW_URL: &str =
    "https://earth.google.com/web/@38.6815,-106.058,2300a,13267d,35y,0h,0t,0r";

/// Deep link centered on one rapid.
///
/// Uses a close-in camera (500 m out, 65° tilt looking down the river).
/// Rapids without surveyed coordinates get the canyon overview instead.
pub fn rapid_url(rapid: &Rapid) -> String {
    // ---
    let Some(coords) = rapid.coordinates else {
        return CANYON_OVERVIEW_URL.to_string();
    };

    format!(
        "https://earth.google.com/web/@{},{},2300a,500d,65y,0h,1t,0r/data=KAI",
        coords.latitude, coords.longitude
    )
}

/// Deep link showing every coordinate-bearing rapid as a KML placemark,
/// camera centered on the first of them. Falls back to the canyon overview
/// when none carry coordinates.
pub fn all_rapids_url(rapids: &[Rapid]) -> String {
    // ---
    let placed: Vec<&Rapid> = rapids.iter().filter(|r| r.coordinates.is_some()).collect();

    let Some(first) = placed.first().and_then(|r| r.coordinates) else {
        return CANYON_OVERVIEW_URL.to_string();
    };

    let kml = rapids_kml(&placed);
    let base = format!(
        "https://earth.google.com/web/@{},{},2300a,13267d,35y,0h,1t,0r",
        first.latitude, first.longitude
    );

    format!("{}/data=KAI?kml={}", base, urlencoding::encode(&kml))
}

/// KML icon style id keyed off the difficulty class. Class IV wins over III
/// for combined ratings like "III-IV".
fn style_for_class(rating: &str) -> &'static str {
    // ---
    if rating.contains("IV") {
        "#classIVIcon"
    } else if rating.contains("III") {
        "#classIIIIcon"
    } else {
        "#classIIIcon"
    }
}

fn rapids_kml(placed: &[&Rapid]) -> String {
    // ---
    let mut kml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Brown's Canyon Rapids</name>
    <description>Rapids on the Arkansas River through Brown's Canyon</description>
    <Style id="classIIIcon">
      <IconStyle>
        <color>ff7b834c</color>
        <scale>1.0</scale>
        <Icon><href>https://maps.google.com/mapfiles/kml/paddle/grn-circle.png</href></Icon>
      </IconStyle>
    </Style>
    <Style id="classIIIIcon">
      <IconStyle>
        <color>ff3c5e8b</color>
        <scale>1.0</scale>
        <Icon><href>https://maps.google.com/mapfiles/kml/paddle/blu-circle.png</href></Icon>
      </IconStyle>
    </Style>
    <Style id="classIVIcon">
      <IconStyle>
        <color>ff242ead</color>
        <scale>1.0</scale>
        <Icon><href>https://maps.google.com/mapfiles/kml/paddle/red-circle.png</href></Icon>
      </IconStyle>
    </Style>"#,
    );

    for rapid in placed {
        // Filtered on coordinates by the caller.
        let Some(coords) = rapid.coordinates else { continue };

        kml.push_str(&format!(
            r#"
    <Placemark>
      <name>{} (Class {})</name>
      <description>{}</description>
      <styleUrl>{}</styleUrl>
      <Point>
        <coordinates>{},{},0</coordinates>
      </Point>
    </Placemark>"#,
            rapid.name,
            rapid.rating,
            rapid.description,
            style_for_class(rapid.rating),
            coords.longitude,
            coords.latitude,
        ));
    }

    kml.push_str(
        "
  </Document>
</kml>",
    );
    kml
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::Coordinates;
    use crate::rapids;

    fn placed_catalog() -> Vec<Rapid> {
        // ---
        let coords = vec![
            (
                "zoom-flume".to_string(),
                Coordinates { latitude: 38.6912, longitude: -106.0571 },
            ),
            (
                "salida-suckhole".to_string(),
                Coordinates { latitude: 38.5432, longitude: -106.0021 },
            ),
        ];
        rapids::with_coordinates(rapids::catalog(), &coords)
    }

    #[test]
    fn test_rapid_url_with_coordinates() {
        // ---
        let rapids = placed_catalog();
        let zoom = rapids.iter().find(|r| r.id == "zoom-flume").unwrap();

        let url = rapid_url(zoom);

        assert_eq!(
            url,
            "https://earth.google.com/web/@38.6912,-106.0571,2300a,500d,65y,0h,1t,0r/data=KAI"
        );
    }

    #[test]
    fn test_rapid_url_without_coordinates_is_overview() {
        // ---
        let rapid = rapids::find("pinball").unwrap();
        assert_eq!(rapid_url(&rapid), CANYON_OVERVIEW_URL);
    }

    #[test]
    fn test_all_rapids_url_centers_on_first_placed() {
        // ---
        let url = all_rapids_url(&placed_catalog());

        assert!(url.starts_with("https://earth.google.com/web/@38.6912,-106.0571,"));
        assert!(url.contains("kml="));
        // KML payload must be percent-encoded, never raw XML.
        assert!(!url.contains('<'));
    }

    #[test]
    fn test_all_rapids_url_without_coordinates_is_overview() {
        // ---
        assert_eq!(all_rapids_url(&rapids::catalog()), CANYON_OVERVIEW_URL);
    }

    #[test]
    fn test_kml_contains_one_placemark_per_placed_rapid() {
        // ---
        let rapids = placed_catalog();
        let placed: Vec<&Rapid> = rapids.iter().filter(|r| r.coordinates.is_some()).collect();

        let kml = rapids_kml(&placed);

        assert_eq!(kml.matches("<Placemark>").count(), 2);
        assert!(kml.contains("Zoom Flume (Class III+)"));
        assert!(kml.contains("<coordinates>-106.0021,38.5432,0</coordinates>"));
    }

    #[test]
    fn test_style_for_class() {
        // ---
        assert_eq!(style_for_class("II+"), "#classIIIcon");
        assert_eq!(style_for_class("III"), "#classIIIIcon");
        assert_eq!(style_for_class("IV"), "#classIVIcon");
        assert_eq!(style_for_class("III-IV"), "#classIVIcon");
    }
}
