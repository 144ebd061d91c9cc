use std::fmt;

/// Machine-readable error codes shared by the engine and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    GraphFileInvalid,
    UnknownFixture,
    UnknownNode,
    InvalidEdge,
    EdgeNotFound,
    DuplicateNode,
    NotReady,
    DegreeTooLow,
    InvalidWalk,
    ArithmeticOverflow,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::GraphFileInvalid => "E1002",
            Self::UnknownFixture => "E1003",
            Self::UnknownNode => "E2001",
            Self::InvalidEdge => "E2002",
            Self::EdgeNotFound => "E2003",
            Self::DuplicateNode => "E2004",
            Self::NotReady => "E3001",
            Self::DegreeTooLow => "E3002",
            Self::InvalidWalk => "E3003",
            Self::ArithmeticOverflow => "E4001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::GraphFileInvalid => "Graph file is invalid",
            Self::UnknownFixture => "Unknown built-in graph",
            Self::UnknownNode => "Node not in graph",
            Self::InvalidEdge => "Invalid edge",
            Self::EdgeNotFound => "Edge not found",
            Self::DuplicateNode => "Duplicate node",
            Self::NotReady => "Traversal not complete",
            Self::DegreeTooLow => "Degree too low",
            Self::InvalidWalk => "Not a walk",
            Self::ArithmeticOverflow => "Count overflow",
        }
    }

    /// Optional remediation hint that can be surfaced to users and scripts.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in netsci.toml and retry."),
            Self::GraphFileInvalid => {
                Some("Provide either `nodes` + `edges` or `adjacency`, with string or integer ids.")
            }
            Self::UnknownFixture => Some("Run `netsci fixtures` to list the built-in graphs."),
            Self::UnknownNode => Some("Check the node id against the graph's node list."),
            Self::InvalidEdge => Some("Graphs are simple: no self-loops, no parallel edges."),
            Self::EdgeNotFound => None,
            Self::DuplicateNode => Some("List every node id once."),
            Self::NotReady => Some("Run the traversal to completion before accumulating."),
            Self::DegreeTooLow => {
                Some("A node needs at least two neighbors for a clustering coefficient.")
            }
            Self::InvalidWalk => Some("Consecutive nodes of a walk must be adjacent."),
            Self::ArithmeticOverflow => Some("Use a smaller graph or a lower power."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why an edge was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRejection {
    SelfLoop,
    Duplicate,
    /// `v` lists `u` as a neighbor but `u` does not list `v`.
    Asymmetric,
}

impl fmt::Display for EdgeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop => f.write_str("self-loop"),
            Self::Duplicate => f.write_str("edge already exists"),
            Self::Asymmetric => f.write_str("adjacency is not symmetric"),
        }
    }
}

/// Errors raised by graph construction and the algorithms built on it.
///
/// Node ids are carried in their `Display` form so the error type stays
/// independent of the graph's id type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown node {node}")]
    UnknownNode { node: String },

    #[error("invalid edge {u}-{v}: {reason}")]
    InvalidEdge {
        u: String,
        v: String,
        reason: EdgeRejection,
    },

    #[error("edge {u}-{v} not found")]
    EdgeNotFound { u: String, v: String },

    #[error("duplicate node {node}")]
    DuplicateNode { node: String },

    #[error("{operation} requires a completed traversal")]
    NotReady { operation: &'static str },

    #[error("node {node} has degree {degree}; clustering needs at least 2")]
    DegreeTooLow { node: String, degree: usize },

    #[error("invalid walk: {reason}")]
    InvalidWalk { reason: String },

    #[error("shortest-path count overflow at node {node}")]
    MultiplicityOverflow { node: String },

    #[error("walk count overflow computing power {power}")]
    WalkCountOverflow { power: u32 },
}

impl GraphError {
    pub(crate) fn unknown(node: &impl fmt::Display) -> Self {
        Self::UnknownNode {
            node: node.to_string(),
        }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownNode { .. } => ErrorCode::UnknownNode,
            Self::InvalidEdge { .. } => ErrorCode::InvalidEdge,
            Self::EdgeNotFound { .. } => ErrorCode::EdgeNotFound,
            Self::DuplicateNode { .. } => ErrorCode::DuplicateNode,
            Self::NotReady { .. } => ErrorCode::NotReady,
            Self::DegreeTooLow { .. } => ErrorCode::DegreeTooLow,
            Self::InvalidWalk { .. } => ErrorCode::InvalidWalk,
            Self::MultiplicityOverflow { .. } | Self::WalkCountOverflow { .. } => {
                ErrorCode::ArithmeticOverflow
            }
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    /// `true` for the clustering "fewer than two neighbors" case, which
    /// callers usually map to a coefficient of zero.
    #[must_use]
    pub const fn is_degree_too_low(&self) -> bool {
        matches!(self, Self::DegreeTooLow { .. })
    }
}
