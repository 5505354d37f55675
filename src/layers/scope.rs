//! Layer scopes and resolution contexts.
//!
//! A scope names one override layer. Precedence follows breadth: studio is
//! broadest and lowest, a task is narrowest and highest. The derived `Ord`
//! encodes exactly that order for the scopes of a single context.

use crate::error::SettingsError;
use std::fmt;
use std::str::FromStr;

/// Name and precedence slot of an override layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Studio,
    Project(String),
    Task { project: String, task: String },
}

impl Scope {
    /// Precedence rank; higher wins
    pub fn rank(&self) -> u8 {
        match self {
            Scope::Studio => 0,
            Scope::Project(_) => 1,
            Scope::Task { .. } => 2,
        }
    }

    /// Whether this layer takes part in resolving `context`
    pub fn applies_to(&self, context: &ResolutionContext) -> bool {
        match self {
            Scope::Studio => true,
            Scope::Project(project) => context.project.as_deref() == Some(project.as_str()),
            Scope::Task { project, task } => {
                context.project.as_deref() == Some(project.as_str())
                    && context.task.as_deref() == Some(task.as_str())
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Studio => write!(f, "studio"),
            Scope::Project(project) => write!(f, "project:{}", project),
            Scope::Task { project, task } => write!(f, "task:{}/{}", project, task),
        }
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && name.trim() == name
}

impl FromStr for Scope {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidLayerName(s.to_string());
        if s == "studio" {
            return Ok(Scope::Studio);
        }
        if let Some(project) = s.strip_prefix("project:") {
            return if valid_name(project) {
                Ok(Scope::Project(project.to_string()))
            } else {
                Err(invalid())
            };
        }
        if let Some(rest) = s.strip_prefix("task:") {
            let (project, task) = rest.split_once('/').ok_or_else(invalid)?;
            return if valid_name(project) && valid_name(task) {
                Ok(Scope::Task {
                    project: project.to_string(),
                    task: task.to_string(),
                })
            } else {
                Err(invalid())
            };
        }
        Err(invalid())
    }
}

/// The explicit context a settings tree is resolved for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResolutionContext {
    project: Option<String>,
    task: Option<String>,
}

impl ResolutionContext {
    /// Studio-wide context: defaults plus the studio layer
    pub fn studio() -> Self {
        Self::default()
    }

    pub fn project(project: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            task: None,
        }
    }

    pub fn task(project: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            task: Some(task.into()),
        }
    }

    /// Build from optional CLI-style parts; a task requires a project
    pub fn from_parts(
        project: Option<String>,
        task: Option<String>,
    ) -> Result<Self, SettingsError> {
        match (project, task) {
            (None, None) => Ok(Self::studio()),
            (Some(project), None) => Ok(Self::project(project)),
            (Some(project), Some(task)) => Ok(Self::task(project, task)),
            (None, Some(task)) => Err(SettingsError::InvalidLayerName(format!("task:/{}", task))),
        }
    }

    /// Scopes that apply to this context, lowest precedence first
    pub fn scopes(&self) -> Vec<Scope> {
        let mut scopes = vec![Scope::Studio];
        if let Some(project) = &self.project {
            scopes.push(Scope::Project(project.clone()));
            if let Some(task) = &self.task {
                scopes.push(Scope::Task {
                    project: project.clone(),
                    task: task.clone(),
                });
            }
        }
        scopes
    }
}

impl fmt::Display for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scopes().last() {
            Some(scope) => write!(f, "{}", scope),
            None => write!(f, "studio"),
        }
    }
}
