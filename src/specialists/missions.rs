//! Mission-planning specialist
//!
//! Rule tables keyed on request keywords. Every list falls back to general
//! guidance when no rule fires, so a successful analysis is never empty.

use crate::error::Result;
use crate::render::{DetailBlock, DetailRenderer, DetailSection};
use crate::specialist::{Payload, Specialist};
use crate::types::CapabilityTag;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Phased plan for a mission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct MissionPlan {
    pub phases: Vec<String>,
    pub objectives: Vec<String>,
    pub required_resources: Vec<String>,
}

impl MissionPlan {
    /// Whether the plan has no content
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty() && self.objectives.is_empty() && self.required_resources.is_empty()
    }
}

/// Risks, opportunities and planning guidance for a mission request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct MissionAnalysis {
    pub risks: Vec<String>,
    pub opportunities: Vec<String>,
    pub investment_recommendations: Vec<String>,
    pub promising_technologies: Vec<String>,
    pub plan: MissionPlan,
}

/// A keyword rule contributing lines to one list
struct Rule {
    keywords: &'static [&'static str],
    lines: &'static [&'static str],
}

impl Rule {
    fn fires(&self, request: &str) -> bool {
        self.keywords.iter().any(|k| request.contains(k))
    }
}

const MARS: &[&str] = &["mars", "martian"];
const MOON: &[&str] = &["moon", "lunar"];

const RISK_RULES: &[Rule] = &[
    Rule {
        keywords: MARS,
        lines: &[
            "Long-duration radiation exposure and its effects on human health.",
            "Difficult landing and ascent due to the thin atmosphere.",
        ],
    },
    Rule {
        keywords: MOON,
        lines: &[
            "Abrasive lunar dust and its impact on equipment.",
            "Extreme temperature swings.",
        ],
    },
];

const OPPORTUNITY_RULES: &[Rule] = &[
    Rule {
        keywords: MARS,
        lines: &[
            "Search for past or present life.",
            "Potential water and mineral resources.",
        ],
    },
    Rule {
        keywords: MOON,
        lines: &[
            "Staging base for future missions to Mars and beyond.",
            "Helium-3 extraction for energy.",
        ],
    },
];

const INVESTMENT_RULES: &[Rule] = &[
    Rule {
        keywords: &["propulsion"],
        lines: &["Invest in research and development of nuclear thermal propulsion."],
    },
    Rule {
        keywords: &["habitat", "housing"],
        lines: &["Focus on 3D printing technologies for building extraterrestrial habitats."],
    },
    Rule {
        keywords: &["resources", "mining"],
        lines: &["Support the development of asteroid mining and in-situ resource techniques."],
    },
    Rule {
        keywords: &["health", "radiation"],
        lines: &["Fund studies on radiation countermeasures and astronaut health."],
    },
];

const TECHNOLOGY_RULES: &[Rule] = &[
    Rule {
        keywords: MARS,
        lines: &[
            "Closed-loop life support systems for Mars.",
            "In-situ propellant production (ISRU) on Mars.",
        ],
    },
    Rule {
        keywords: MOON,
        lines: &[
            "Oxygen extraction from lunar regolith.",
            "Autonomous robotics for lunar construction.",
        ],
    },
    Rule {
        keywords: &["travel", "transport"],
        lines: &[
            "High-efficiency electric and ion propulsion.",
            "Modular, reusable spacecraft.",
        ],
    },
];

const GENERAL_RISK: &str = "General space mission risks: equipment failure, high costs.";
const GENERAL_OPPORTUNITY: &str =
    "General space mission opportunities: scientific progress, technological development.";
const GENERAL_INVESTMENT: &str =
    "General recommendation: invest in AI for mission autonomy and advanced robotics.";
const GENERAL_TECHNOLOGY: &str =
    "General technologies: quantum computing for trajectory optimization, nanotechnology for lightweight materials.";

fn apply(rules: &[Rule], request: &str) -> Vec<String> {
    rules
        .iter()
        .filter(|r| r.fires(request))
        .flat_map(|r| r.lines.iter().map(|l| l.to_string()))
        .collect()
}

fn or_general(lines: Vec<String>, general: &str) -> Vec<String> {
    if lines.is_empty() {
        vec![general.to_string()]
    } else {
        lines
    }
}

fn to_strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

fn plan(request: &str) -> MissionPlan {
    if MARS.iter().any(|k| request.contains(k)) {
        MissionPlan {
            objectives: to_strings(&["Establish a sustainable human presence on Mars."]),
            phases: to_strings(&[
                "Phase 1: Reconnaissance and landing site selection.",
                "Phase 2: Delivery of cargo and robotic equipment.",
                "Phase 3: Initial crewed mission and habitat construction.",
                "Phase 4: Base expansion and scientific research.",
            ]),
            required_resources: to_strings(&[
                "Super heavy-lift launch vehicles.",
                "Advanced life support systems.",
                "ISRU equipment.",
                "Large financial investment and international collaboration.",
            ]),
        }
    } else if MOON.iter().any(|k| request.contains(k)) {
        MissionPlan {
            objectives: to_strings(&["Establish a permanent lunar base for research and exploration."]),
            phases: to_strings(&[
                "Phase 1: Detailed mapping and resource prospecting.",
                "Phase 2: Robotic missions to prepare the site.",
                "Phase 3: Initial infrastructure construction (power, communications).",
                "Phase 4: Crewed missions to assemble and operate the base.",
            ]),
            required_resources: to_strings(&[
                "Prefabricated habitation modules.",
                "Autonomous construction robots.",
                "Solar and nuclear power systems.",
                "Public-private partnerships.",
            ]),
        }
    } else {
        MissionPlan {
            objectives: to_strings(&["Carry out space exploration safely and efficiently."]),
            phases: to_strings(&[
                "Definition of objectives and requirements.",
                "Selection of technologies and partners.",
                "Mission execution and monitoring.",
            ]),
            required_resources: to_strings(&["Multidisciplinary team and adequate funding."]),
        }
    }
}

/// Analyze a mission request
pub fn analyze_mission(request: &str) -> MissionAnalysis {
    let request = request.to_lowercase();

    let mut risks = apply(RISK_RULES, &request);
    let mut opportunities = apply(OPPORTUNITY_RULES, &request);
    // Risks and opportunities share one fallback condition.
    if risks.is_empty() && opportunities.is_empty() {
        risks.push(GENERAL_RISK.to_string());
        opportunities.push(GENERAL_OPPORTUNITY.to_string());
    }

    MissionAnalysis {
        risks,
        opportunities,
        investment_recommendations: or_general(apply(INVESTMENT_RULES, &request), GENERAL_INVESTMENT),
        promising_technologies: or_general(apply(TECHNOLOGY_RULES, &request), GENERAL_TECHNOLOGY),
        plan: plan(&request),
    }
}

/// Rule-based mission planner
#[derive(Debug, Clone, Default)]
pub struct MissionPlanningSpecialist;

impl MissionPlanningSpecialist {
    /// Create the planner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Specialist for MissionPlanningSpecialist {
    fn tag(&self) -> CapabilityTag {
        CapabilityTag::MissionPlanning
    }

    fn name(&self) -> &str {
        "mission-planning"
    }

    async fn invoke(&self, request: &str) -> Result<Payload> {
        let analysis = analyze_mission(request);
        debug!(
            risks = analysis.risks.len(),
            technologies = analysis.promising_technologies.len(),
            "mission analysis finished"
        );
        Ok(Payload::MissionPlanning(analysis))
    }
}

impl DetailRenderer for MissionAnalysis {
    fn detail_blocks(&self) -> Vec<DetailBlock> {
        let mut blocks = vec![DetailBlock::new(
            "Mission Analysis",
            vec![
                DetailSection::text("Risks", self.risks.iter().cloned()),
                DetailSection::text("Opportunities", self.opportunities.iter().cloned()),
                DetailSection::text(
                    "Investment recommendations",
                    self.investment_recommendations.iter().cloned(),
                ),
                DetailSection::text(
                    "Promising technologies",
                    self.promising_technologies.iter().cloned(),
                ),
            ],
        )];

        if !self.plan.is_empty() {
            blocks.push(DetailBlock::new(
                "Mission Plan",
                vec![
                    DetailSection::text("Objectives", self.plan.objectives.iter().cloned()),
                    DetailSection::text("Phases", self.plan.phases.iter().cloned()),
                    DetailSection::text("Required resources", self.plan.required_resources.iter().cloned()),
                ],
            ));
        }
        blocks
    }
}
