//! Two-point calibration of the background image.
//!
//! The operator picks two points on the image and enters the real-world
//! distance between them; the ratio gives the pixels-per-foot scale used
//! for every booth.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calibration errors. All of them leave any existing calibration untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("Distance must be a positive number of feet, got {0:?}")]
    InvalidDistance(String),
    #[error("Calibration points coincide")]
    DegeneratePoints,
    #[error("Scale rounds to zero pixels per foot")]
    ScaleTooSmall,
    #[error("Two points must be picked before entering a distance")]
    NotReady,
}

/// A completed calibration, as persisted with the floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    pub point1: Point,
    pub point2: Point,
    pub real_distance_feet: f64,
    pub pixels_per_foot: f64,
}

impl Calibration {
    /// Derive the scale from two layout-space points and their real distance.
    ///
    /// `pixels_per_foot` is rounded to two decimals.
    pub fn from_points(
        point1: Point,
        point2: Point,
        real_distance_feet: f64,
    ) -> Result<Self, CalibrationError> {
        if !real_distance_feet.is_finite() || real_distance_feet <= 0.0 {
            return Err(CalibrationError::InvalidDistance(real_distance_feet.to_string()));
        }
        let pixel_distance = point1.distance(point2);
        if pixel_distance <= 0.0 {
            return Err(CalibrationError::DegeneratePoints);
        }
        let pixels_per_foot = round_to_hundredths(pixel_distance / real_distance_feet);
        if pixels_per_foot <= 0.0 {
            return Err(CalibrationError::ScaleTooSmall);
        }
        Ok(Self {
            point1,
            point2,
            real_distance_feet,
            pixels_per_foot,
        })
    }

    /// Distance between the reference points in layout pixels.
    pub fn pixel_distance(&self) -> f64 {
        self.point1.distance(self.point2)
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse an operator-entered distance in feet.
pub fn parse_distance_feet(input: &str) -> Result<f64, CalibrationError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(feet) if feet.is_finite() && feet > 0.0 => Ok(feet),
        _ => Err(CalibrationError::InvalidDistance(trimmed.to_string())),
    }
}

/// Progress of an in-flight calibration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CalibrationStep {
    #[default]
    AwaitingFirstPoint,
    AwaitingSecondPoint { point1: Point },
    AwaitingDistance { point1: Point, point2: Point },
}

/// Collects the two reference picks and validates the distance.
///
/// The engine never touches a floor plan; a successful [`CalibrationEngine::submit_distance`]
/// hands back a [`Calibration`] for the caller to apply.
#[derive(Debug, Clone, Default)]
pub struct CalibrationEngine {
    active: bool,
    step: CalibrationStep,
}

impl CalibrationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) calibration, dropping any previous picks.
    pub fn begin(&mut self) {
        self.active = true;
        self.step = CalibrationStep::AwaitingFirstPoint;
    }

    /// Abandon calibration.
    pub fn cancel(&mut self) {
        self.active = false;
        self.step = CalibrationStep::AwaitingFirstPoint;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn step(&self) -> CalibrationStep {
        self.step
    }

    /// Points picked so far, in order.
    pub fn picks(&self) -> Vec<Point> {
        match self.step {
            CalibrationStep::AwaitingFirstPoint => Vec::new(),
            CalibrationStep::AwaitingSecondPoint { point1 } => vec![point1],
            CalibrationStep::AwaitingDistance { point1, point2 } => vec![point1, point2],
        }
    }

    /// Record a layout-space pick.
    ///
    /// Clicks after the second pick are ignored until a distance is
    /// submitted or calibration restarts.
    pub fn register_click(&mut self, point: Point) -> CalibrationStep {
        if !self.active {
            return self.step;
        }
        self.step = match self.step {
            CalibrationStep::AwaitingFirstPoint => {
                CalibrationStep::AwaitingSecondPoint { point1: point }
            }
            CalibrationStep::AwaitingSecondPoint { point1 } => CalibrationStep::AwaitingDistance {
                point1,
                point2: point,
            },
            waiting @ CalibrationStep::AwaitingDistance { .. } => waiting,
        };
        self.step
    }

    /// Validate the entered distance and finish.
    ///
    /// On error the picks are cleared and calibration restarts from the
    /// first point; the engine stays active.
    pub fn submit_distance(&mut self, input: &str) -> Result<Calibration, CalibrationError> {
        let CalibrationStep::AwaitingDistance { point1, point2 } = self.step else {
            return Err(CalibrationError::NotReady);
        };
        let result = parse_distance_feet(input)
            .and_then(|feet| Calibration::from_points(point1, point2, feet));
        match result {
            Ok(calibration) => {
                self.active = false;
                self.step = CalibrationStep::AwaitingFirstPoint;
                Ok(calibration)
            }
            Err(e) => {
                self.step = CalibrationStep::AwaitingFirstPoint;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_from_points() {
        let cal = Calibration::from_points(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 10.0)
            .unwrap();
        assert!((cal.pixels_per_foot - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scale_rounded_to_two_decimals() {
        // 100 / 3 = 33.333...
        let cal = Calibration::from_points(Point::ZERO, Point::new(0.0, 100.0), 3.0).unwrap();
        assert!((cal.pixels_per_foot - 33.33).abs() < 1e-9);

        // Diagonal: 50 px
        let cal = Calibration::from_points(Point::ZERO, Point::new(30.0, 40.0), 7.0).unwrap();
        assert!((cal.pixels_per_foot - 7.14).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_points() {
        let p = Point::new(5.0, 5.0);
        assert_eq!(
            Calibration::from_points(p, p, 10.0),
            Err(CalibrationError::DegeneratePoints)
        );
    }

    #[test]
    fn test_scale_too_small() {
        let result = Calibration::from_points(Point::ZERO, Point::new(1.0, 0.0), 1000.0);
        assert_eq!(result, Err(CalibrationError::ScaleTooSmall));
    }

    #[test]
    fn test_parse_distance() {
        assert_eq!(parse_distance_feet(" 12.5 "), Ok(12.5));
        assert!(parse_distance_feet("0").is_err());
        assert!(parse_distance_feet("-3").is_err());
        assert!(parse_distance_feet("ten").is_err());
        assert!(parse_distance_feet("").is_err());
        assert!(parse_distance_feet("inf").is_err());
        assert!(parse_distance_feet("NaN").is_err());
    }

    #[test]
    fn test_engine_two_clicks_then_distance() {
        let mut engine = CalibrationEngine::new();
        engine.begin();
        assert_eq!(
            engine.register_click(Point::new(0.0, 0.0)),
            CalibrationStep::AwaitingSecondPoint { point1: Point::ZERO }
        );
        let step = engine.register_click(Point::new(100.0, 0.0));
        assert!(matches!(step, CalibrationStep::AwaitingDistance { .. }));

        let cal = engine.submit_distance("10").unwrap();
        assert!((cal.pixels_per_foot - 10.0).abs() < f64::EPSILON);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_engine_third_click_ignored() {
        let mut engine = CalibrationEngine::new();
        engine.begin();
        engine.register_click(Point::new(0.0, 0.0));
        engine.register_click(Point::new(10.0, 0.0));
        engine.register_click(Point::new(99.0, 99.0));
        assert_eq!(engine.picks(), vec![Point::ZERO, Point::new(10.0, 0.0)]);
    }

    #[test]
    fn test_engine_invalid_distance_restarts() {
        let mut engine = CalibrationEngine::new();
        engine.begin();
        engine.register_click(Point::new(0.0, 0.0));
        engine.register_click(Point::new(100.0, 0.0));

        let err = engine.submit_distance("abc").unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidDistance(_)));
        assert!(engine.is_active());
        assert!(engine.picks().is_empty());
    }

    #[test]
    fn test_engine_distance_before_points() {
        let mut engine = CalibrationEngine::new();
        engine.begin();
        assert_eq!(engine.submit_distance("10"), Err(CalibrationError::NotReady));
    }

    #[test]
    fn test_begin_clears_previous_picks() {
        let mut engine = CalibrationEngine::new();
        engine.begin();
        engine.register_click(Point::new(1.0, 1.0));
        engine.begin();
        assert!(engine.picks().is_empty());
    }

    #[test]
    fn test_clicks_ignored_when_inactive() {
        let mut engine = CalibrationEngine::new();
        engine.register_click(Point::new(1.0, 1.0));
        assert!(engine.picks().is_empty());
    }
}
