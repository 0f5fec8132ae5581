// Infrastructure: Local model and solution files

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::models::{ModelPayload, SolutionArtifact};

/// Stub used by the installation self-test
pub const TEST_STUB: &str = "test";

/// One-variable, one-constraint NL model written by the self-test
pub const TEST_MODEL: &str = "g3 0 1 0
 1 1 1 0 0
 1 1
 0 0
 1 1 1
 0 0 0 1
 0 0 0 0 0
 1 1
 0 0
 0 0 0 0 0
C0
o16
o5
v0
n2
O0 0
o5
v0
n2
x1
0 0.5
r
1 -1
b
3
k0
J0 1
0 1
G0 1
0 0
";

pub fn read_model(path: &Path) -> io::Result<ModelPayload> {
    fs::read_to_string(path).map(ModelPayload::new)
}

pub fn write_solution(path: &Path, artifact: &SolutionArtifact) -> io::Result<()> {
    fs::write(path, artifact.text.as_bytes())
}

/// Write `test.nl` into `dir` and return its path
pub fn write_test_model(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(format!("{}.nl", TEST_STUB));
    fs::write(&path, TEST_MODEL)?;
    info!(path = %path.display(), "wrote self-test model");
    Ok(path)
}
