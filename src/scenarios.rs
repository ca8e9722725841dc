//! Built-in inspection scenario catalog.
//!
//! Each scenario pairs a prompt template with canned demo data so the CLI
//! can run end to end without a credential. The demo data has the same
//! shape as a live service reply and flows through the same rendering
//! paths.

use crate::{AnalysisResult, BoundingBox, DetectionEvent, Metric, Severity};

/// One selectable analysis scenario.
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Prompt template sent to the analysis service. The client appends
    /// the video file sentence; nothing else is interpolated.
    pub prompt: &'static str,
    demo_report: &'static str,
    demo_metrics: &'static [(&'static str, f64)],
    demo_events: &'static [DemoEvent],
}

struct DemoEvent {
    time: &'static str,
    description: &'static str,
    severity: Severity,
    bounds: Option<BoundingBox>,
}

impl Scenario {
    /// Canned result for offline runs, shaped exactly like a validated
    /// service reply.
    pub fn demo_result(&self) -> AnalysisResult {
        AnalysisResult {
            report: self.demo_report.to_string(),
            metrics: self
                .demo_metrics
                .iter()
                .map(|(name, value)| Metric {
                    name: (*name).to_string(),
                    value: *value,
                })
                .collect(),
            events: self
                .demo_events
                .iter()
                .map(|event| DetectionEvent {
                    time: event.time.to_string(),
                    description: event.description.to_string(),
                    severity: event.severity,
                    bounds: event.bounds,
                })
                .collect(),
        }
    }
}

/// All built-in scenarios, in menu order.
pub fn scenarios() -> &'static [Scenario] {
    SCENARIOS
}

/// Look up a scenario by its stable id.
pub fn find(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.id == id)
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "vessel-inspection",
        name: "Vessel Inspection",
        description: "Analyze drone footage for hull corrosion, structural integrity, and equipment status.",
        prompt: r#"You are SkyScan AI, an advanced drone footage analysis system.
Based on the uploaded video for a "Vessel Inspection" scenario, generate a detailed inspection report.
The report should include:
1. A concise summary of the vessel's condition.
2. A list of key findings (e.g., corrosion, fouling, structural anomalies) with timestamps.
3. A set of actionable recommendations (e.g., "Recommend cleaning and re-inspection within 3 months.").
Format the output as clear, human-readable text."#,
        demo_report: "The vessel presents in overall fair condition. Hull plating is sound \
            above the waterline, with localized corrosion and moderate biofouling \
            concentrated on the forward third of the hull. One structural indication near \
            Frame 150 warrants a close-up survey before the next scheduled docking.\n\
            \nKey findings:\n\
            1. Minor surface corrosion on the starboard bow near the waterline (01:12).\n\
            2. Moderate marine fouling across the port hull midbody (03:45).\n\
            3. Linear indication consistent with a stress fracture adjacent to Frame 150 (07:21).\n\
            4. Propeller blades clean and free of visible deformation (10:05).\n\
            \nRecommendations:\n\
            1. Schedule hull cleaning and antifouling renewal within 3 months.\n\
            2. Commission a close-visual survey of the Frame 150 indication within 30 days.\n\
            3. Treat and monitor the starboard bow corrosion at the next maintenance window.",
        demo_metrics: &[
            ("Corrosion", 28.0),
            ("Fouling", 45.0),
            ("Structural Anomaly", 5.0),
            ("Overall Integrity", 85.0),
        ],
        demo_events: &[
            DemoEvent {
                time: "01:12",
                description: "Minor corrosion detected on starboard bow.",
                severity: Severity::Info,
                bounds: None,
            },
            DemoEvent {
                time: "03:45",
                description: "Moderate fouling observed on port hull.",
                severity: Severity::Warning,
                bounds: None,
            },
            DemoEvent {
                time: "07:21",
                description: "Potential stress fracture near Frame 150.",
                severity: Severity::Alert,
                bounds: Some(BoundingBox {
                    x: 0.42,
                    y: 0.31,
                    width: 0.18,
                    height: 0.12,
                }),
            },
            DemoEvent {
                time: "10:05",
                description: "Propeller appears to be in good condition.",
                severity: Severity::Info,
                bounds: None,
            },
        ],
    },
    Scenario {
        id: "worksite-inspection",
        name: "Worksite Inspection",
        description: "Monitor worksites for safety compliance, PPE usage, and operational efficiency.",
        prompt: r#"You are SkyScan AI, an advanced drone footage analysis system.
Based on the uploaded video for a "Worksite Inspection" scenario (e.g., Tuas Port reclamation), generate a detailed safety and progress report.
The report should include:
1. An overall safety compliance summary.
2. A list of observed events, noting any PPE violations or hazardous conditions with timestamps.
3. An assessment of work progress (e.g., material movement, land settling).
4. Recommendations for improving safety and efficiency.
Format the output as clear, human-readable text."#,
        demo_report: "Overall safety compliance on site is high, with one serious PPE \
            violation observed. Earthworks are tracking slightly ahead of plan, and \
            equipment movement is orderly along the designated haul routes.\n\
            \nObserved events:\n\
            1. Worker in Sector B operating without a hard hat (02:30).\n\
            2. Excavator cycle activity in Zone 3 within the approved window (05:15).\n\
            3. Safety cone barrier on the north access road displaced from its marked line (06:40).\n\
            4. Fresh fill material placed and graded in Zone 4 (11:20).\n\
            \nRecommendations:\n\
            1. Brief the Sector B crew on mandatory head protection before the next shift.\n\
            2. Reinstate and anchor the north access road cone barrier.\n\
            3. Continue current fill sequencing; progress supports the planned settlement schedule.",
        demo_metrics: &[
            ("PPE Compliance", 92.0),
            ("Hazard Zones", 3.0),
            ("Equipment Utilization", 78.0),
            ("Progress vs. Plan", 95.0),
        ],
        demo_events: &[
            DemoEvent {
                time: "02:30",
                description: "Worker in Sector B without a hard hat.",
                severity: Severity::Alert,
                bounds: Some(BoundingBox {
                    x: 0.55,
                    y: 0.22,
                    width: 0.08,
                    height: 0.21,
                }),
            },
            DemoEvent {
                time: "05:15",
                description: "Excavator activity detected in Zone 3.",
                severity: Severity::Info,
                bounds: None,
            },
            DemoEvent {
                time: "06:40",
                description: "Safety cone barrier appears to be moved.",
                severity: Severity::Warning,
                bounds: None,
            },
            DemoEvent {
                time: "11:20",
                description: "New fill material observed in Zone 4.",
                severity: Severity::Info,
                bounds: None,
            },
        ],
    },
    Scenario {
        id: "environmental-monitoring",
        name: "Environmental Monitoring",
        description: "Track emission plumes, water quality, and changes in the local ecosystem.",
        prompt: r#"You are SkyScan AI, an advanced drone footage analysis system.
Based on the uploaded video for an "Environmental Monitoring" scenario, generate a detailed environmental impact report.
The report should include:
1. A summary of environmental observations.
2. Detection of any emission plumes, specifying their duration and potential source with timestamps.
3. Analysis of water surface for any signs of pollution or thermal anomalies.
4. Recommendations for further investigation or mitigation actions.
Format the output as clear, human-readable text."#,
        demo_report: "Ambient conditions around the facility remain within normal bounds, \
            with one emission event exceeding the two-minute reporting threshold. Water \
            quality in the outflow channel shows slight discoloration worth a follow-up \
            sample; shoreline vegetation is stable.\n\
            \nObservations:\n\
            1. Emission plume rising from stack A, drifting northeast (00:55).\n\
            2. Plume persisted beyond two minutes, exceeding the reporting threshold (04:18).\n\
            3. Slight discoloration in the water outflow channel near the south weir (08:02).\n\
            4. No significant change in shoreline vegetation cover (12:45).\n\
            \nRecommendations:\n\
            1. Pull stack A combustion logs for the interval around the plume event.\n\
            2. Collect a grab sample from the outflow channel for turbidity screening.\n\
            3. Keep the current monthly vegetation transect schedule.",
        demo_metrics: &[
            ("Air Quality Index", 65.0),
            ("Water Turbidity", 30.0),
            ("Thermal Anomaly", 12.0),
            ("Vegetation Health", 88.0),
        ],
        demo_events: &[
            DemoEvent {
                time: "00:55",
                description: "Emission plume detected from stack A.",
                severity: Severity::Warning,
                bounds: Some(BoundingBox {
                    x: 0.30,
                    y: 0.05,
                    width: 0.26,
                    height: 0.38,
                }),
            },
            DemoEvent {
                time: "04:18",
                description: "Plume lasted for over 2 minutes.",
                severity: Severity::Alert,
                bounds: None,
            },
            DemoEvent {
                time: "08:02",
                description: "Slight discoloration noted in water outflow channel.",
                severity: Severity::Warning,
                bounds: None,
            },
            DemoEvent {
                time: "12:45",
                description: "No significant changes in shoreline vegetation.",
                severity: Severity::Info,
                bounds: None,
            },
        ],
    },
    Scenario {
        id: "parcel-delivery",
        name: "Drone Parcel Delivery",
        description: "Monitor drone delivery routes for obstacles, safety, and delivery confirmation.",
        prompt: r#"You are SkyScan AI, an advanced drone footage analysis system.
Based on the uploaded video for a "Drone Parcel Delivery" scenario, generate a flight and delivery log.
The report should include:
1. A summary of the flight from takeoff to landing.
2. A log of any detected obstacles or deviations from the planned flight path, with timestamps.
3. Confirmation of package delivery at the target location.
4. Any safety or efficiency recommendations for future flights.
Format the output as clear, human-readable text."#,
        demo_report: "Flight completed nominally from takeoff to recovery with a single \
            en-route deviation. The package was released and confirmed at the target \
            coordinates, and the return leg stayed on the planned corridor.\n\
            \nFlight log:\n\
            1. Takeoff initiated and climb-out stable (00:00).\n\
            2. Lateral deviation executed to avoid a flock of birds crossing the corridor (02:10).\n\
            3. Package released and delivery confirmed at target coordinates (04:35).\n\
            4. Return leg completed; drone landed at base (05:50).\n\
            \nRecommendations:\n\
            1. Add the observed bird activity area to the pre-flight hazard brief.\n\
            2. No other corrective actions; flight efficiency within the normal band.",
        demo_metrics: &[
            ("Path Adherence", 99.0),
            ("Obstacles Detected", 1.0),
            ("Delivery Success", 100.0),
            ("Flight Efficiency", 97.0),
        ],
        demo_events: &[
            DemoEvent {
                time: "00:00",
                description: "Drone takeoff initiated.",
                severity: Severity::Info,
                bounds: None,
            },
            DemoEvent {
                time: "02:10",
                description: "Flight path deviation to avoid flock of birds.",
                severity: Severity::Warning,
                bounds: Some(BoundingBox {
                    x: 0.61,
                    y: 0.40,
                    width: 0.15,
                    height: 0.09,
                }),
            },
            DemoEvent {
                time: "04:35",
                description: "Package successfully delivered to coordinates.",
                severity: Severity::Info,
                bounds: None,
            },
            DemoEvent {
                time: "05:50",
                description: "Drone returned to base and landed.",
                severity: Severity::Info,
                bounds: None,
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{segment_report, ReportBlock};
    use crate::timecode::parse_timestamp;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_unique_ids() {
        let ids: HashSet<_> = scenarios().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), scenarios().len());
        assert_eq!(scenarios().len(), 4);
    }

    #[test]
    fn find_resolves_known_ids_only() {
        assert_eq!(
            find("vessel-inspection").map(|s| s.name),
            Some("Vessel Inspection")
        );
        assert!(find("ground-survey").is_none());
    }

    #[test]
    fn every_demo_timestamp_parses() {
        for scenario in scenarios() {
            for event in scenario.demo_result().events {
                assert!(
                    parse_timestamp(&event.time).is_some(),
                    "{}: {} does not parse",
                    scenario.id,
                    event.time
                );
            }
        }
    }

    #[test]
    fn every_prompt_opens_with_the_system_line() {
        for scenario in scenarios() {
            assert!(scenario
                .prompt
                .starts_with("You are SkyScan AI, an advanced drone footage analysis system."));
        }
    }

    #[test]
    fn demo_reports_segment_into_items_and_paragraphs() {
        for scenario in scenarios() {
            let blocks = segment_report(&scenario.demo_result().report);
            assert!(blocks
                .iter()
                .any(|b| matches!(b, ReportBlock::Item(_))));
            assert!(blocks
                .iter()
                .any(|b| matches!(b, ReportBlock::Paragraph(_))));
        }
    }

    #[test]
    fn demo_results_serialize_with_wire_field_names() {
        let result = find("worksite-inspection")
            .expect("catalog entry")
            .demo_result();
        let value = serde_json::to_value(&result).expect("serializes");
        let first = &value["events"][0];
        assert_eq!(first["type"], "alert");
        assert!(first["box"].is_object());
        let second = &value["events"][1];
        assert!(second.get("box").is_none());
    }

    #[test]
    fn demo_boxes_survive_clamping() {
        for scenario in scenarios() {
            for event in scenario.demo_result().events {
                if let Some(bounds) = event.bounds {
                    assert!(bounds.clamped().is_some(), "{}", scenario.id);
                }
            }
        }
    }
}
