use serde_json::json;

/// Which GraphQL spatial scalar a [`Point`] surfaces as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    Cartesian,
    Geographic,
}

/// A spatial point as stored by the database. `srid` determines both the
/// coordinate system and the dimensionality.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub srid: u32,
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}
impl Point {
    pub const WGS84_2D: u32 = 4326;
    pub const WGS84_3D: u32 = 4979;
    pub const CARTESIAN_2D: u32 = 7203;
    pub const CARTESIAN_3D: u32 = 9157;

    pub fn geographic(longitude: f64, latitude: f64, height: Option<f64>) -> Self {
        Self {
            srid: if height.is_some() { Self::WGS84_3D } else { Self::WGS84_2D },
            x: longitude,
            y: latitude,
            z: height,
        }
    }

    pub fn cartesian(x: f64, y: f64, z: Option<f64>) -> Self {
        Self {
            srid: if z.is_some() { Self::CARTESIAN_3D } else { Self::CARTESIAN_2D },
            x,
            y,
            z,
        }
    }

    pub fn kind(&self) -> PointKind {
        match self.srid {
            Self::CARTESIAN_2D | Self::CARTESIAN_3D => PointKind::Cartesian,
            _ => PointKind::Geographic,
        }
    }

    pub fn crs(&self) -> &'static str {
        match self.srid {
            Self::WGS84_3D => "wgs-84-3d",
            Self::CARTESIAN_2D => "cartesian",
            Self::CARTESIAN_3D => "cartesian-3d",
            _ => "wgs-84",
        }
    }

    /// Decomposes the point into the fields of the `Point` or
    /// `CartesianPoint` GraphQL object types.
    pub fn to_graphql(&self) -> serde_json::Value {
        match self.kind() {
            PointKind::Geographic => json!({
                "longitude": self.x,
                "latitude": self.y,
                "height": self.z,
                "crs": self.crs(),
                "srid": self.srid,
            }),
            PointKind::Cartesian => json!({
                "x": self.x,
                "y": self.y,
                "z": self.z,
                "crs": self.crs(),
                "srid": self.srid,
            }),
        }
    }
}
