//! JOIN clauses.

use std::fmt;

use crate::error::QbResult;
use crate::param::ParamList;
use crate::qb::{Select, SqlQb};

/// Join type keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Outer => "OUTER",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `source = target` equality for an ON clause. Binds nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct On {
    source: String,
    target: String,
}

impl On {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn build(&self) -> String {
        format!("{} = {}", self.source, self.target)
    }
}

/// What a join reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinTarget {
    Table(String),
    Subquery(Box<Select>),
}

/// `KIND JOIN target[ alias][ ON a = b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    kind: JoinKind,
    target: JoinTarget,
    alias: Option<String>,
    on: Option<On>,
}

impl Join {
    pub fn new(kind: JoinKind, target: JoinTarget, alias: Option<String>) -> Self {
        Self {
            kind,
            target,
            alias,
            on: None,
        }
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub(crate) fn set_on(&mut self, on: On) {
        self.on = Some(on);
    }

    /// Render the clause; a subquery target contributes its params.
    pub fn build(&self, params: &mut ParamList) -> QbResult<String> {
        let mut sql = format!("{} JOIN ", self.kind);
        match &self.target {
            JoinTarget::Table(table) => sql.push_str(table),
            JoinTarget::Subquery(select) => {
                sql.push('(');
                sql.push_str(&select.build_into(params)?);
                sql.push(')');
            }
        }
        if let Some(alias) = &self.alias {
            sql.push(' ');
            sql.push_str(alias);
        }
        if let Some(on) = &self.on {
            sql.push_str(" ON ");
            sql.push_str(&on.build());
        }
        Ok(sql)
    }
}
