use serde::Serialize;

/// Descriptions for obstacle type codes reported by the robot's camera.
pub fn obstacle_description(obstacle_type: u16) -> Option<&'static str> {
    let description = match obstacle_type {
        0 => "cable",
        1 => "pet waste",
        2 => "shoes",
        3 => "poop",
        4 => "pedestal",
        5 => "extension cord",
        9 => "weighting scale",
        10 => "clothes",
        25 => "dustpan",
        26 | 27 => "furniture with a crossbar",
        34 => "clothes",
        48 => "cable",
        49 | 50 => "pet",
        51 => "fabric/paper balls",
        _ => return None,
    };
    Some(description)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObstacleDetails {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub obstacle_type: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_name: Option<String>,
}

/// An obstacle detected on the floor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub details: ObstacleDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_obstacle_descriptions() {
        assert_eq!(obstacle_description(0), Some("cable"));
        assert_eq!(obstacle_description(27), Some("furniture with a crossbar"));
        assert_eq!(obstacle_description(50), Some("pet"));
        assert_eq!(obstacle_description(6), None);
        assert_eq!(obstacle_description(1000), None);
    }
}
