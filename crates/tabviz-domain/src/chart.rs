//! Chart types and cascade methods

use serde::{Deserialize, Serialize};

/// Visualization type assigned to a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartType {
    /// Discrete categories against one value
    #[serde(rename = "bar")]
    Bar,
    /// Values over an ordered (usually temporal) axis
    #[serde(rename = "line")]
    Line,
    /// Parts of a whole
    #[serde(rename = "pie")]
    Pie,
    /// Two numeric dimensions against each other
    #[serde(rename = "scatter")]
    Scatter,
    /// Few labels, several numeric dimensions
    #[serde(rename = "radar")]
    Radar,
    /// Many labels, rendered as a 3D bar field
    #[serde(rename = "3d_bar")]
    Bar3d,
    /// Many numeric dimensions, rendered as a 3D point cloud
    #[serde(rename = "3d_scatter")]
    Scatter3d,
    /// Nothing could be determined (empty input)
    #[serde(rename = "unknown")]
    Unknown,
}

impl ChartType {
    /// All chart types, in declaration order
    pub const ALL: [ChartType; 8] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Pie,
        ChartType::Scatter,
        ChartType::Radar,
        ChartType::Bar3d,
        ChartType::Scatter3d,
        ChartType::Unknown,
    ];

    /// Wire name of the chart type
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
            ChartType::Radar => "radar",
            ChartType::Bar3d => "3d_bar",
            ChartType::Scatter3d => "3d_scatter",
            ChartType::Unknown => "unknown",
        }
    }

    /// Parse a chart type name.
    ///
    /// Accepts the wire names plus the older `*_chart` / `*_plot` spellings
    /// (`bar_chart`, `3d_scatter_plot`, ...) that generative models tend to
    /// produce. Matching is case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase().replace([' ', '-'], "_");
        let name = lowered
            .strip_suffix("_chart")
            .or_else(|| lowered.strip_suffix("_plot"))
            .unwrap_or(&lowered);

        match name {
            "bar" => Some(ChartType::Bar),
            "line" => Some(ChartType::Line),
            "pie" => Some(ChartType::Pie),
            "scatter" => Some(ChartType::Scatter),
            "radar" => Some(ChartType::Radar),
            "3d_bar" => Some(ChartType::Bar3d),
            "3d_scatter" => Some(ChartType::Scatter3d),
            "unknown" => Some(ChartType::Unknown),
            _ => None,
        }
    }

    /// Whether stored exemplars may carry this chart type
    pub fn is_exemplar_type(&self) -> bool {
        matches!(self, ChartType::Bar | ChartType::Line)
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid chart type: {}", s))
    }
}

/// Cascade stage that produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Shape-based rules over the record set
    Heuristic,
    /// Nearest stored exemplar
    Retrieval,
    /// Generative model reply
    Generative,
    /// Terminal fallback
    Default,
}

impl Method {
    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Heuristic => "heuristic",
            Method::Retrieval => "retrieval",
            Method::Generative => "generative",
            Method::Default => "default",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_wire_names() {
        for chart in ChartType::ALL {
            assert_eq!(ChartType::parse(chart.as_str()), Some(chart));
        }
    }

    #[test]
    fn test_parse_legacy_spellings() {
        assert_eq!(ChartType::parse("bar_chart"), Some(ChartType::Bar));
        assert_eq!(ChartType::parse("Line Chart"), Some(ChartType::Line));
        assert_eq!(ChartType::parse("scatter_plot"), Some(ChartType::Scatter));
        assert_eq!(ChartType::parse("3d_scatter_plot"), Some(ChartType::Scatter3d));
        assert_eq!(ChartType::parse("3D_BAR_CHART"), Some(ChartType::Bar3d));
        assert_eq!(ChartType::parse("histogram"), None);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&ChartType::Scatter3d).unwrap();
        assert_eq!(json, "\"3d_scatter\"");
        let parsed: ChartType = serde_json::from_str("\"3d_bar\"").unwrap();
        assert_eq!(parsed, ChartType::Bar3d);
        assert_eq!(serde_json::to_string(&Method::Retrieval).unwrap(), "\"retrieval\"");
    }

    #[test]
    fn test_exemplar_types() {
        assert!(ChartType::Bar.is_exemplar_type());
        assert!(ChartType::Line.is_exemplar_type());
        assert!(!ChartType::Pie.is_exemplar_type());
    }
}
