//! Fixed registry of pure Report → artifact functions, selected by name
//! at the boundary. Emitters know nothing about tool invocation; they see
//! only the aggregated Report.

mod annotations;
mod cobertura;
mod codequality;
mod junit;
mod sarif;
mod xml;

use crate::errors::EmitError;
use crate::model::Report;

pub type EmitFn = fn(&Report) -> Result<String, EmitError>;

pub struct EmitterSpec {
    pub name: &'static str,
    /// Fixed artifact file name; stable across runs for CI consumers.
    pub artifact: &'static str,
    pub emit: EmitFn,
}

pub const EMITTERS: &[EmitterSpec] = &[
    EmitterSpec {
        name: "sarif",
        artifact: "sarif.json",
        emit: sarif::emit,
    },
    EmitterSpec {
        name: "codequality",
        artifact: "codequality.json",
        emit: codequality::emit,
    },
    EmitterSpec {
        name: "junit",
        artifact: "junit.xml",
        emit: junit::emit,
    },
    EmitterSpec {
        name: "cobertura",
        artifact: "cobertura.xml",
        emit: cobertura::emit,
    },
    EmitterSpec {
        name: "annotations",
        artifact: "annotations.txt",
        emit: annotations::emit,
    },
];

pub fn find(name: &str) -> Result<&'static EmitterSpec, EmitError> {
    EMITTERS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| EmitError::Unknown(name.to_string()))
}

pub fn names() -> impl Iterator<Item = &'static str> {
    EMITTERS.iter().map(|spec| spec.name)
}

/// Serialize the report through one emitter and write its artifact under
/// `dir`. Returns the written path.
pub fn write_artifact(
    spec: &EmitterSpec,
    dir: &std::path::Path,
    report: &Report,
) -> Result<std::path::PathBuf, EmitError> {
    let artifact = (spec.emit)(report)?;
    let path = dir.join(spec.artifact);
    std::fs::write(&path, artifact).map_err(|source| EmitError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registry_lookup() {
        assert_eq!(find("junit").unwrap().artifact, "junit.xml");
        assert_eq!(find("JUnit").unwrap().artifact, "junit.xml");
        assert!(find("html").is_err());
    }

    #[test]
    fn every_emitter_accepts_an_empty_report() {
        let report = crate::report::aggregate(vec![], vec![], false, "run", "2026-02-01T10:00:00Z");
        for spec in EMITTERS {
            let text = (spec.emit)(&report).unwrap();
            assert!(!text.is_empty(), "{} produced nothing", spec.name);
        }
    }
}
