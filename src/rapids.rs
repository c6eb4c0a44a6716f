//! The rapid catalog for Brown's Canyon, ordered north to south, plus the
//! coordinate enrichment used by the map deep links.
//!
//! The catalog itself is static data; GPS coordinates live in a separately
//! hosted CSV (surveyed after the catalog was written) and are joined on by
//! slugified rapid name when a caller asks for them.

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::models::{Coordinates, MapPosition, Rapid};

// ---

/// All named rapids in the canyon, without coordinates.
pub fn catalog() -> Vec<Rapid> {
    // ---
    fn rapid(
        id: &'static str,
        name: &'static str,
        rating: &'static str,
        x: f64,
        y: f64,
        description: &'static str,
        notes: &'static str,
        video_url: Option<&'static str>,
    ) -> Rapid {
        Rapid {
            id,
            name,
            rating,
            position: MapPosition { x, y },
            description,
            notes,
            video_url,
            coordinates: None,
        }
    }

    const RUN_VIDEO: &str = "https://www.youtube.com/embed/dQw4w9WgXcQ";

    vec![
        rapid(
            "canyon-doors",
            "Canyon Doors",
            "II+",
            75.0,
            10.0,
            "The entrance to Brown's Canyon, offering a gentle introduction to what lies ahead.",
            "Wide and forgiving, a good warm-up rapid for beginners.",
            None,
        ),
        rapid(
            "zoom-flume",
            "Zoom Flume",
            "III+",
            76.0,
            15.0,
            "One of the most exciting rapids in the canyon with a fast-moving flume.",
            "Enter left, move right to avoid the hole at the bottom.",
            Some(RUN_VIDEO),
        ),
        rapid(
            "squeeze-play",
            "Squeeze Play",
            "III",
            73.0,
            20.0,
            "A narrow channel that forces rafts to navigate between large boulders.",
            "Stay centered to avoid getting pinned on either side.",
            None,
        ),
        rapid(
            "big-drop",
            "Big Drop",
            "III",
            71.0,
            25.0,
            "Features a significant vertical drop followed by turbulent water.",
            "Hit it straight and prepare for the splash!",
            Some(RUN_VIDEO),
        ),
        rapid(
            "staircase",
            "Staircase",
            "III",
            72.0,
            30.0,
            "A series of ledges creating a staircase effect.",
            "Run center, be prepared for multiple drops in succession.",
            Some(RUN_VIDEO),
        ),
        rapid(
            "hemroid-rock",
            "Hemroid Rock",
            "II+",
            60.0,
            35.0,
            "Named for the uncomfortable experience if you hit the center rock wrong.",
            "Stay river left to avoid the aptly named rock in the center.",
            None,
        ),
        rapid(
            "widow-maker",
            "Widow Maker",
            "III+",
            59.0,
            40.0,
            "A challenging rapid with a significant drop and dangerous hydraulics.",
            "Scout from river right if water levels are high. Avoid the center hole at all costs.",
            Some(RUN_VIDEO),
        ),
        rapid(
            "raft-ripper",
            "Raft Ripper",
            "III",
            58.0,
            45.0,
            "Known for sharp rocks that can damage equipment if not navigated properly.",
            "Technical rapid requiring precise maneuvering. Watch for exposed rocks at lower flows.",
            None,
        ),
        rapid(
            "last-chance",
            "Last Chance",
            "II+",
            55.0,
            50.0,
            "The final significant rapid in the upper section of the canyon.",
            "A straightforward run with a few obstacles to navigate around.",
            None,
        ),
        rapid(
            "salida-suckhole",
            "Salida Suckhole",
            "IV",
            48.0,
            55.0,
            "One of the most difficult rapids in Brown's Canyon with a powerful hydraulic.",
            "Stay right to avoid the large hole in the center. Can be portaged at high water.",
            Some(RUN_VIDEO),
        ),
        rapid(
            "twin-falls",
            "Twin Falls",
            "III",
            48.0,
            60.0,
            "Features two distinct drops in quick succession.",
            "Run the first drop slightly left, then move right for the second.",
            None,
        ),
        rapid(
            "pinball",
            "Pinball",
            "III",
            45.0,
            65.0,
            "A technical rapid with multiple rocks to navigate, like a pinball machine.",
            "Stay center-right to avoid the large boulder on river left.",
            Some(RUN_VIDEO),
        ),
        rapid(
            "stone-bridge",
            "Stone Bridge",
            "II+",
            40.0,
            70.0,
            "Named for the historic stone bridge visible from the rapid.",
            "A straightforward rapid with a beautiful view of the bridge.",
            None,
        ),
        rapid(
            "big-bend",
            "Big Bend",
            "II",
            40.0,
            75.0,
            "A sweeping turn in the river with gentle waves.",
            "Easy rapid, but watch for the strong current pushing toward the outer bank.",
            None,
        ),
        rapid(
            "drift-inn",
            "Drift Inn",
            "II+",
            47.0,
            80.0,
            "A popular stopping point with a calm eddy on river right.",
            "Good place to regroup before the final stretch.",
            None,
        ),
        rapid(
            "sqaw-creek",
            "Sqaw Creek",
            "II",
            40.0,
            85.0,
            "The final rapid before reaching the take-out point.",
            "Gentle waves and a good cool-down after the more challenging sections upstream.",
            None,
        ),
    ]
}

/// Look up a single rapid by its id.
pub fn find(id: &str) -> Option<Rapid> {
    // ---
    catalog().into_iter().find(|r| r.id == id)
}

// ---

/// Slug used to join CSV rows onto catalog entries ("Zoom Flume" -> "zoom-flume").
fn slugify(name: &str) -> String {
    // ---
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// Parse the hosted coordinates CSV into (slug, coordinates) pairs.
///
/// The first row is a header naming at least `name`, `latitude`, and
/// `longitude` columns (in any order). Rows that are short, empty, or carry
/// unparseable numbers are skipped rather than failing the whole file.
pub fn parse_coordinates_csv(csv: &str) -> Result<Vec<(String, Coordinates)>> {
    // ---
    let mut lines = csv.lines().filter(|l| !l.trim().is_empty());

    let header = lines.next().ok_or_else(|| anyhow!("empty coordinates CSV"))?;
    let columns: Vec<&str> = header.split(',').map(|h| h.trim()).collect();

    let col = |name: &str| -> Result<usize> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| anyhow!("coordinates CSV missing '{}' column", name))
    };
    let name_col = col("name")?;
    let lat_col = col("latitude")?;
    let lon_col = col("longitude")?;

    let mut coordinates = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        if fields.len() <= name_col.max(lat_col).max(lon_col) {
            continue;
        }

        let (Ok(latitude), Ok(longitude)) =
            (fields[lat_col].parse::<f64>(), fields[lon_col].parse::<f64>())
        else {
            debug!("Skipping coordinates row with bad numbers: {}", line);
            continue;
        };

        coordinates.push((
            slugify(fields[name_col]),
            Coordinates { latitude, longitude },
        ));
    }

    Ok(coordinates)
}

/// Fetch and parse the hosted coordinates CSV.
pub async fn fetch_coordinates(
    client: &reqwest::Client,
    csv_url: &str,
) -> Result<Vec<(String, Coordinates)>> {
    // ---
    debug!("Fetching rapid coordinates from: {}", csv_url);

    let response = client.get(csv_url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow!("Failed to fetch coordinates: {}", response.status()));
    }

    parse_coordinates_csv(&response.text().await?)
}

/// Join coordinates onto the catalog by slugified rapid name. Entries with
/// no matching CSV row keep `coordinates: None`.
pub fn with_coordinates(
    mut rapids: Vec<Rapid>,
    coordinates: &[(String, Coordinates)],
) -> Vec<Rapid> {
    // ---
    for rapid in &mut rapids {
        let slug = slugify(rapid.name);
        if let Some((_, coords)) = coordinates.iter().find(|(name, _)| *name == slug) {
            rapid.coordinates = Some(*coords);
        }
    }
    rapids
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        // ---
        let rapids = catalog();
        for (i, a) in rapids.iter().enumerate() {
            for b in &rapids[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_find_by_id() {
        // ---
        let rapid = find("zoom-flume").expect("catalog entry");
        assert_eq!(rapid.name, "Zoom Flume");
        assert_eq!(rapid.rating, "III+");

        assert!(find("class-v-dreams").is_none());
    }

    #[test]
    fn test_slugify() {
        // ---
        assert_eq!(slugify("Zoom Flume"), "zoom-flume");
        assert_eq!(slugify("  Salida   Suckhole "), "salida-suckhole");
    }

    #[test]
    fn test_parse_coordinates_csv() {
        // ---
        let csv = "name,latitude,longitude\n\
                   Zoom Flume,38.6912,-106.0571\n\
                   Widow Maker,38.6623,-106.0489\n";

        let coords = parse_coordinates_csv(csv).unwrap();

        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].0, "zoom-flume");
        assert_eq!(coords[0].1.latitude, 38.6912);
        assert_eq!(coords[1].1.longitude, -106.0489);
    }

    #[test]
    fn test_parse_skips_malformed_rows() {
        // ---
        let csv = "name,latitude,longitude\n\
                   Zoom Flume,not-a-number,-106.0571\n\
                   Pinball,38.6501\n\
                   \n\
                   Widow Maker,38.6623,-106.0489\n";

        let coords = parse_coordinates_csv(csv).unwrap();

        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0].0, "widow-maker");
    }

    #[test]
    fn test_parse_rejects_missing_columns() {
        // ---
        assert!(parse_coordinates_csv("name,lat,lon\nZoom Flume,1,2\n").is_err());
        assert!(parse_coordinates_csv("").is_err());
    }

    #[test]
    fn test_with_coordinates_joins_by_name() {
        // ---
        let coords = vec![(
            "zoom-flume".to_string(),
            Coordinates { latitude: 38.6912, longitude: -106.0571 },
        )];

        let rapids = with_coordinates(catalog(), &coords);

        let zoom = rapids.iter().find(|r| r.id == "zoom-flume").unwrap();
        assert_eq!(zoom.coordinates.unwrap().latitude, 38.6912);

        let pinball = rapids.iter().find(|r| r.id == "pinball").unwrap();
        assert!(pinball.coordinates.is_none());
    }
}
