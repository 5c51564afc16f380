//! eHYD header parsing and metadata extraction.
//!
//! Scans a bounded prefix of the export for German marker tokens, builds
//! the station metadata, resolves the coordinate block and locates the
//! `Werte:` line where the data section begins.

use crate::constants::{
    COORDINATE_ROW_OFFSET, GAUGE_DATUM_ROW_OFFSET, METRIC_DECIMALS, NOT_AVAILABLE, markers,
};
use crate::coordinates::{parse_coordinate_line, round_decimals, station_movement_m};
use crate::error::{EhydError, Result};
use crate::models::{
    DataBoundaries, Datatype, HeaderScan, MetaErrorFlag, StationLocation, StationMetadata,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Extract metadata, location and data boundaries from the header lines.
///
/// Only the first `limit` lines are searched for markers; the scan stops at
/// the `Werte:` line.
pub fn parse_ehyd_header(lines: &[String], path: &Path, limit: usize) -> Result<HeaderScan> {
    let first_line = lines.first().ok_or_else(|| EhydError::EmptyFile {
        path: path.to_path_buf(),
    })?;

    let mut builder = StationMetadataBuilder::new(marker_value(first_line));

    for index in 0..limit.min(lines.len()) {
        builder.parse_line(lines, index, path, limit)?;
        if builder.data_marker.is_some() {
            break;
        }
    }

    let scan = builder.build(path, limit)?;

    debug!(
        "Parsed header for {}: HZB={}, datatype={}, data starts at line {}",
        path.display(),
        scan.metadata.hzb,
        scan.metadata.datatype,
        scan.boundaries.data_start_line + 1
    );

    Ok(scan)
}

/// Builder for station metadata extraction
struct StationMetadataBuilder {
    station_name: String,
    hzb: Option<i64>,
    hd_num: Option<String>,
    dbms_num: Option<String>,
    catchment_name: Option<String>,
    catchment_symbol: Option<String>,
    subcatchment: Option<String>,
    reg_name: Option<String>,
    province: Option<String>,
    operator: Option<String>,
    catchment_size: Option<String>,
    datatype: Datatype,
    elevation: Option<f64>,
    depth: Option<f64>,
    location: Option<StationLocation>,
    data_marker: Option<usize>,
}

impl StationMetadataBuilder {
    fn new(station_name: String) -> Self {
        Self {
            station_name,
            hzb: None,
            hd_num: None,
            dbms_num: None,
            catchment_name: None,
            catchment_symbol: None,
            subcatchment: None,
            reg_name: None,
            province: None,
            operator: None,
            catchment_size: None,
            datatype: Datatype::Unknown,
            elevation: None,
            depth: None,
            location: None,
            data_marker: None,
        }
    }

    /// Apply every marker found on line `index`.
    ///
    /// Markers are not exclusive: one line may trigger several of them.
    fn parse_line(
        &mut self,
        lines: &[String],
        index: usize,
        path: &Path,
        limit: usize,
    ) -> Result<()> {
        let line = lines[index].as_str();

        if line.contains(markers::RIVERWATER) {
            self.datatype = Datatype::Riverwater;
            self.catchment_name = non_empty(marker_value(line));
        }
        if line.contains(markers::PRECIPITATION) {
            self.datatype = Datatype::Precipitation;
            self.catchment_name = Some(self.station_name.clone());
        }
        if line.contains(markers::SPRING) {
            self.datatype = Datatype::Spring;
        }
        if line.contains(markers::GROUNDWATER) {
            self.datatype = Datatype::Groundwater;
            let name = marker_value(line);
            self.catchment_symbol = Some(catchment_symbol(&name));
            self.catchment_name = non_empty(name);
            // The smaller groundwater region sits on the line above the body name
            self.subcatchment = index
                .checked_sub(1)
                .and_then(|previous| non_empty(marker_value(&lines[previous])));
        }
        if line.contains(markers::AUTHORITY) {
            self.reg_name = non_empty(marker_value(line));
        }
        if line.contains(markers::PROVINCE) {
            self.province = non_empty(marker_value(line));
        }
        if line.contains(markers::OPERATOR) {
            self.operator = non_empty(marker_value(line));
        }
        if line.contains(markers::HZB_NUMBER) {
            let value = marker_value(line);
            let hzb = value
                .parse::<i64>()
                .map_err(|_| EhydError::InvalidHeaderValue {
                    path: path.to_path_buf(),
                    field: markers::HZB_NUMBER,
                    line: index + 1,
                    value: value.clone(),
                })?;
            debug!("HZB: {}", hzb);
            self.hzb = Some(hzb);
        }
        if line.contains(markers::HD_NUMBER) {
            self.hd_num = non_empty(marker_value(line));
        }
        if line.contains(markers::DBMS_NUMBER) {
            self.dbms_num = non_empty(marker_value(line));
        }
        if line.contains(markers::CATCHMENT_SIZE) {
            self.catchment_size = non_empty(marker_value(line));
        }
        if line.contains(markers::COORDINATES) {
            self.location = Some(resolve_coordinate_block(lines, index, path, limit)?);
        }
        if line.contains(markers::MEASURING_POINT_ELEVATION) {
            self.elevation =
                parse_decimal(&marker_value(line), markers::MEASURING_POINT_ELEVATION);
        }
        if line.contains(markers::BOTTOM_LEVEL) {
            self.depth = parse_decimal(&marker_value(line), markers::BOTTOM_LEVEL);
        }
        if line.contains(markers::SPRING_ELEVATION) {
            self.elevation = parse_decimal(&marker_value(line), markers::SPRING_ELEVATION);
        }
        if line.contains(markers::GAUGE_DATUM) && self.datatype == Datatype::Riverwater {
            // Precipitation and spring headers place this value elsewhere
            self.elevation = lines
                .get(index + GAUGE_DATUM_ROW_OFFSET)
                .and_then(|row| parse_decimal(&marker_value(row), markers::GAUGE_DATUM));
        }
        if line.contains(markers::DATA_START) {
            self.data_marker = Some(index);
        }

        Ok(())
    }

    fn build(self, path: &Path, limit: usize) -> Result<HeaderScan> {
        let hzb = self.hzb.ok_or_else(|| EhydError::MissingField {
            path: path.to_path_buf(),
            field: markers::HZB_NUMBER,
            limit,
        })?;

        let marker_line = self.data_marker.ok_or_else(|| EhydError::NoDataMarker {
            path: path.to_path_buf(),
            limit,
        })?;

        let location = self.location.unwrap_or_else(|| {
            warn!("Station {} has no coordinate block", hzb);
            StationLocation {
                meta_error: MetaErrorFlag::MissingCoordinates,
                ..StationLocation::default()
            }
        });

        let computed_depth = match (self.elevation, self.depth) {
            (Some(elevation), Some(depth)) => {
                Some(round_decimals(elevation - depth, METRIC_DECIMALS))
            }
            _ => None,
        };

        Ok(HeaderScan {
            metadata: StationMetadata {
                station_name: self.station_name,
                hzb,
                hd_num: self.hd_num,
                dbms_num: self.dbms_num,
                catchment_name: self.catchment_name,
                catchment_symbol: self.catchment_symbol,
                subcatchment: self.subcatchment,
                reg_name: self.reg_name,
                province: self.province,
                operator: self.operator,
                catchment_size: self.catchment_size,
                datatype: self.datatype,
                elevation: self.elevation,
                depth: self.depth,
                computed_depth,
            },
            location,
            boundaries: DataBoundaries {
                marker_line,
                data_start_line: marker_line + 1,
            },
        })
    }
}

/// Resolve the coordinate rows following a `Koordinaten` marker.
///
/// Rows start two lines below the marker and end at the `Exportzeitreihe`
/// line. A relocated station lists one row per position, oldest first.
fn resolve_coordinate_block(
    lines: &[String],
    marker: usize,
    path: &Path,
    limit: usize,
) -> Result<StationLocation> {
    let first_row = marker + COORDINATE_ROW_OFFSET;

    let terminator = lines
        .iter()
        .enumerate()
        .take(limit)
        .skip(first_row + 1)
        .find(|(_, line)| {
            line.contains(markers::COORDINATES_END) || line.contains(markers::DATA_START)
        })
        .filter(|(_, line)| line.contains(markers::COORDINATES_END))
        .map(|(index, _)| index)
        .ok_or_else(|| EhydError::UnterminatedCoordinates {
            path: path.to_path_buf(),
            line: marker + 1,
        })?;

    let last_row = terminator - 1;
    let parse_row = |row: usize| {
        parse_coordinate_line(&lines[row]).map_err(|source| EhydError::MalformedCoordinate {
            path: path.to_path_buf(),
            line: row + 1,
            source,
        })
    };

    if first_row == last_row {
        let coordinate = parse_row(first_row)?;
        let meta_error = if coordinate.is_none() {
            warn!("{} is missing coordinates", path.display());
            MetaErrorFlag::MissingCoordinates
        } else {
            MetaErrorFlag::None
        };
        return Ok(StationLocation {
            coordinate,
            movement_m: None,
            relocations: 0,
            meta_error,
        });
    }

    let relocations = last_row - first_row;
    info!(
        "{} lists {} coordinate rows; station was moved during its lifetime",
        path.display(),
        relocations + 1
    );

    let oldest = parse_row(first_row)?;
    let newest = parse_row(last_row)?;
    let moved = MetaErrorFlag::StationMoved;

    let location = match (oldest, newest) {
        (Some(old), Some(new)) => {
            let distance = station_movement_m(old, new);
            info!("{} was moved by {:.0} meters", path.display(), distance);
            StationLocation {
                coordinate: Some(new),
                movement_m: Some(distance),
                relocations,
                meta_error: moved,
            }
        }
        (Some(old), None) => {
            warn!(
                "{} was moved by an unknown distance; using the older location",
                path.display()
            );
            StationLocation {
                coordinate: Some(old),
                movement_m: None,
                relocations,
                meta_error: moved.combine(MetaErrorFlag::MissingCoordinates),
            }
        }
        (None, newest) => {
            warn!(
                "{} is missing its original coordinates; distance moved is unknown",
                path.display()
            );
            StationLocation {
                coordinate: newest,
                movement_m: None,
                relocations,
                meta_error: moved.combine(MetaErrorFlag::MissingCoordinates),
            }
        }
    };

    Ok(location)
}

/// Text after the first `;` of a header line
fn marker_value(line: &str) -> String {
    line.split_once(';')
        .map(|(_, rest)| rest.trim().trim_end_matches(';').trim_end())
        .unwrap_or_default()
        .to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Three-letter code in front of the `]` of a name like `Grazer Feld [MUR]`
fn catchment_symbol(name: &str) -> String {
    if name.contains('[') {
        if let Some(symbol) = name
            .find(']')
            .and_then(|end| end.checked_sub(3).and_then(|start| name.get(start..end)))
        {
            return symbol.to_string();
        }
    }
    NOT_AVAILABLE.to_string()
}

/// Parse a decimal-comma number; empty values are absent
fn parse_decimal(value: &str, field: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }

    match value.replace(',', ".").parse::<f64>() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!("Could not parse {} value: {}", field, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HEADER_SCAN_LIMIT;
    use std::path::PathBuf;

    fn lines(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|row| row.to_string()).collect()
    }

    fn scan(rows: &[&str]) -> Result<HeaderScan> {
        parse_ehyd_header(&lines(rows), &PathBuf::from("test.csv"), HEADER_SCAN_LIMIT)
    }

    fn groundwater_header() -> Vec<&'static str> {
        vec![
            "Messstelle:;Graz-Andritz",
            "HZB-Nummer:;301234",
            "HD-Nummer:;GW 12-3",
            "DBMS-Nummer:;",
            "Dienststelle:;HD-Steiermark",
            "Messstellenbetreiber:;Land Steiermark",
            "PorenGW-Gebiet:;Grazer Feld",
            "Grundwasserkörper:;Grazer Feld (Graz/Andritz - Wildon) [MUR]",
            "Koordinaten:",
            "gültig seit:;Länge (Grad,Min,Sek):;Breite (Grad,Min,Sek):",
            "01.01.1971;15 25 30 ;47 06 10",
            "Exportzeitreihe:;Tagesmittel",
            "Messpunkthöhe:;365,12",
            "Sohllage:;345,02",
            "Werte:",
            "01.01.2000 00:00:00;   350,12   ;",
        ]
    }

    #[test]
    fn test_groundwater_header() {
        let scan = scan(&groundwater_header()).unwrap();
        let metadata = scan.metadata;

        assert_eq!(metadata.station_name, "Graz-Andritz");
        assert_eq!(metadata.hzb, 301234);
        assert_eq!(metadata.hd_num.as_deref(), Some("GW 12-3"));
        assert_eq!(metadata.dbms_num, None);
        assert_eq!(metadata.reg_name.as_deref(), Some("HD-Steiermark"));
        assert_eq!(metadata.operator.as_deref(), Some("Land Steiermark"));
        assert_eq!(metadata.province, None);
        assert_eq!(metadata.datatype, Datatype::Groundwater);
        assert_eq!(
            metadata.catchment_name.as_deref(),
            Some("Grazer Feld (Graz/Andritz - Wildon) [MUR]")
        );
        assert_eq!(metadata.catchment_symbol.as_deref(), Some("MUR"));
        assert_eq!(metadata.subcatchment.as_deref(), Some("Grazer Feld"));
        assert_eq!(metadata.elevation, Some(365.12));
        assert_eq!(metadata.depth, Some(345.02));
        assert_eq!(metadata.computed_depth, Some(20.1));

        let coordinate = scan.location.coordinate.unwrap();
        assert_eq!(coordinate.lon, 15.425);
        assert_eq!(coordinate.lat, 47.10277778);
        assert_eq!(scan.location.meta_error, MetaErrorFlag::None);
        assert_eq!(scan.location.movement_m, None);

        assert_eq!(scan.boundaries.marker_line, 14);
        assert_eq!(scan.boundaries.data_start_line, 15);
    }

    #[test]
    fn test_groundwater_without_catchment_code() {
        let mut rows = groundwater_header();
        rows[7] = "Grundwasserkörper:;Murdurchbruchstal";

        let metadata = scan(&rows).unwrap().metadata;
        assert_eq!(metadata.catchment_symbol.as_deref(), Some(NOT_AVAILABLE));
        assert_eq!(metadata.catchment_name.as_deref(), Some("Murdurchbruchstal"));
    }

    #[test]
    fn test_riverwater_gauge_datum() {
        let rows = vec![
            "Messstelle:;Mureck",
            "HZB-Nummer:;211912",
            "HD-Nummer:;",
            "Gewässer:;Mur",
            "Einzugsgebiet:;10319,4",
            "Dienststelle:;HD-Steiermark",
            "Pegelnullpunkt:",
            "gültig seit:;Höhe [m ü.A.]:",
            "01.01.1974;228,53",
            "Koordinaten:",
            "gültig seit:;Länge (Grad,Min,Sek):;Breite (Grad,Min,Sek):",
            "01.01.1974;15 46 28 ;46 42 25",
            "Exportzeitreihe:;Wasserstand-Tagesmittel",
            "Werte:",
        ];

        let scan = scan(&rows).unwrap();
        assert_eq!(scan.metadata.datatype, Datatype::Riverwater);
        assert_eq!(scan.metadata.catchment_name.as_deref(), Some("Mur"));
        assert_eq!(scan.metadata.catchment_size.as_deref(), Some("10319,4"));
        assert_eq!(scan.metadata.hd_num, None);
        assert_eq!(scan.metadata.elevation, Some(228.53));
        assert_eq!(scan.metadata.computed_depth, None);
        assert_eq!(scan.boundaries.data_start_line, 14);
    }

    #[test]
    fn test_precipitation_uses_station_name_as_catchment() {
        let rows = vec![
            "Messstelle:;Graz-Universität",
            "HZB-Nummer:;112086",
            "Niederschlag",
            "Koordinaten:",
            "gültig seit:;Länge (Grad,Min,Sek):;Breite (Grad,Min,Sek):",
            "01.01.1894;15 27 01 ;47 04 37",
            "Exportzeitreihe:;Niederschlag-Tagessummen",
            "Werte:",
        ];

        let metadata = scan(&rows).unwrap().metadata;
        assert_eq!(metadata.datatype, Datatype::Precipitation);
        assert_eq!(metadata.catchment_name.as_deref(), Some("Graz-Universität"));
    }

    #[test]
    fn test_gauge_datum_ignored_for_groundwater() {
        let mut rows = groundwater_header();
        rows.splice(
            14..14,
            [
                "Pegelnullpunkt:",
                "gültig seit:;Höhe [m ü.A.]:",
                "01.01.1974;228,53",
            ],
        );

        let scan = scan(&rows).unwrap();
        assert_eq!(scan.metadata.datatype, Datatype::Groundwater);
        assert_eq!(scan.metadata.elevation, Some(365.12));
        assert_eq!(scan.metadata.computed_depth, Some(20.1));
        assert_eq!(scan.boundaries.marker_line, 17);
    }

    #[test]
    fn test_gauge_datum_ignored_for_spring() {
        let rows = vec![
            "Messstelle:;Ursprung",
            "HZB-Nummer:;395012",
            "Hauptquelle:;Ursprungquelle",
            "Geländehöhe-Hauptquelle:;812,40",
            "Pegelnullpunkt:",
            "gültig seit:;Höhe [m ü.A.]:",
            "01.01.1980;700,00",
            "Koordinaten:",
            "gültig seit:;Länge (Grad,Min,Sek):;Breite (Grad,Min,Sek):",
            "01.01.1980;14 02 10 ;47 41 55",
            "Exportzeitreihe:;Quellschüttung-Tagesmittel",
            "Werte:",
        ];

        let metadata = scan(&rows).unwrap().metadata;
        assert_eq!(metadata.datatype, Datatype::Spring);
        assert_eq!(metadata.elevation, Some(812.4));
    }

    #[test]
    fn test_spring_with_empty_elevation() {
        let rows = vec![
            "Messstelle:;Ursprung",
            "HZB-Nummer:;395012",
            "Hauptquelle:;Ursprungquelle",
            "Geländehöhe-Hauptquelle:;",
            "Koordinaten:",
            "gültig seit:;Länge (Grad,Min,Sek):;Breite (Grad,Min,Sek):",
            "01.01.1980;14 02 10 ;47 41 55",
            "Exportzeitreihe:;Quellschüttung-Tagesmittel",
            "Werte:",
        ];

        let metadata = scan(&rows).unwrap().metadata;
        assert_eq!(metadata.datatype, Datatype::Spring);
        assert_eq!(metadata.elevation, None);
        assert_eq!(metadata.catchment_name, None);
    }

    #[test]
    fn test_relocated_station_uses_newest_row() {
        let mut rows = groundwater_header();
        rows.splice(
            10..11,
            [
                "01.01.1971;15 25 30 ;47 06 10",
                "01.01.1985;15 25 40 ;47 06 20",
                "01.01.2003;15 25 50 ;47 06 30",
            ],
        );

        let scan = scan(&rows).unwrap();
        let coordinate = scan.location.coordinate.unwrap();
        assert_eq!(coordinate.lon, 15.43055556);
        assert_eq!(coordinate.lat, 47.10833333);
        assert_eq!(scan.location.relocations, 2);
        assert_eq!(scan.location.meta_error, MetaErrorFlag::StationMoved);

        let moved = scan.location.movement_m.unwrap();
        assert!(moved > 0.0 && moved < 1000.0, "moved {}", moved);
    }

    #[test]
    fn test_relocated_station_with_missing_newest_falls_back() {
        let mut rows = groundwater_header();
        rows.splice(
            10..11,
            ["01.01.1971;15 25 30 ;47 06 10", "01.01.1985;0;0"],
        );

        let scan = scan(&rows).unwrap();
        assert_eq!(scan.location.coordinate.unwrap().lon, 15.425);
        assert_eq!(scan.location.movement_m, None);
        assert_eq!(scan.location.meta_error, MetaErrorFlag::MissingCoordinates);
    }

    #[test]
    fn test_relocated_station_with_missing_oldest_uses_newest() {
        let mut rows = groundwater_header();
        rows.splice(
            10..11,
            ["01.01.1971;0;0", "01.01.1985;15 25 30 ;47 06 10"],
        );

        let scan = scan(&rows).unwrap();
        assert_eq!(scan.location.coordinate.unwrap().lat, 47.10277778);
        assert_eq!(scan.location.movement_m, None);
        assert_eq!(scan.location.meta_error, MetaErrorFlag::MissingCoordinates);
    }

    #[test]
    fn test_missing_coordinates_sentinel() {
        let mut rows = groundwater_header();
        rows[10] = "01.01.1971;0;0";

        let scan = scan(&rows).unwrap();
        assert_eq!(scan.location.coordinate, None);
        assert_eq!(scan.location.meta_error, MetaErrorFlag::MissingCoordinates);
    }

    #[test]
    fn test_malformed_coordinate_is_fatal() {
        let mut rows = groundwater_header();
        rows[10] = "01.01.1971;15 2x 30 ;47 06 10";

        match scan(&rows) {
            Err(EhydError::MalformedCoordinate { line, .. }) => assert_eq!(line, 11),
            other => panic!("expected MalformedCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_coordinate_block() {
        let mut rows = groundwater_header();
        rows.remove(11);

        assert!(matches!(
            scan(&rows),
            Err(EhydError::UnterminatedCoordinates { line: 9, .. })
        ));
    }

    #[test]
    fn test_missing_hzb_is_fatal() {
        let mut rows = groundwater_header();
        rows.remove(1);

        assert!(matches!(
            scan(&rows),
            Err(EhydError::MissingField {
                field: "HZB-Nummer",
                ..
            })
        ));
    }

    #[test]
    fn test_non_numeric_hzb_is_fatal() {
        let mut rows = groundwater_header();
        rows[1] = "HZB-Nummer:;30A234";

        assert!(matches!(
            scan(&rows),
            Err(EhydError::InvalidHeaderValue { line: 2, .. })
        ));
    }

    #[test]
    fn test_data_marker_outside_scan_window() {
        let rows = lines(&groundwater_header());
        let result = parse_ehyd_header(&rows, &PathBuf::from("test.csv"), 14);

        assert!(matches!(
            result,
            Err(EhydError::NoDataMarker { limit: 14, .. })
        ));
    }

    #[test]
    fn test_missing_coordinate_block() {
        let rows = vec!["Messstelle:;Irgendwo", "HZB-Nummer:;1", "Werte:"];

        let scan = scan(&rows).unwrap();
        assert_eq!(scan.location.coordinate, None);
        assert_eq!(scan.location.meta_error, MetaErrorFlag::MissingCoordinates);
    }

    #[test]
    fn test_marker_value() {
        assert_eq!(marker_value("HZB-Nummer:;301234"), "301234");
        assert_eq!(marker_value("Bundesland:; Steiermark ;"), "Steiermark");
        assert_eq!(marker_value("Koordinaten:"), "");
    }
}
