use super::listing::parse_listing;
use super::process::{command_line, ProcessOutput, ProcessRunner, SystemRunner};
use super::{Compressor, SizePair};
use crate::config::CompressorConfig;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, info};

/// Executables tried, in order, when no compressor program is configured.
pub const CANDIDATE_PROGRAMS: &[&str] = &["7z", "7zz", "7za"];

/// Compressor adapter for the 7-Zip command line (`a` to create, `l` to list).
pub struct SevenZip<R: ProcessRunner = SystemRunner> {
    program: String,
    create_args: Vec<String>,
    runner: R,
}

impl SevenZip<SystemRunner> {
    /// Build from configuration, detecting the executable when none is set.
    pub fn from_config(config: &CompressorConfig) -> Result<Self> {
        let program = match &config.program {
            Some(program) => program.clone(),
            None => detect_program(&SystemRunner)?,
        };
        info!("Using compressor '{}'", program);
        Ok(SevenZip::with_runner(program, SystemRunner).create_args(config.create_args.clone()))
    }
}

impl<R: ProcessRunner> SevenZip<R> {
    pub fn with_runner(program: impl Into<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            create_args: Vec::new(),
            runner,
        }
    }

    pub fn create_args(mut self, args: Vec<String>) -> Self {
        self.create_args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run_checked(&self, args: Vec<OsString>) -> Result<ProcessOutput> {
        let output = self.runner.run(&self.program, &args)?;
        if !output.success() {
            return Err(Error::ExternalTool {
                command: command_line(&self.program, &args),
                status: match output.code {
                    Some(code) => format!("exit code {code}"),
                    None => "terminated by signal".to_string(),
                },
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

impl<R: ProcessRunner> Compressor for SevenZip<R> {
    fn compress_one_file(&self, input: &Path, archive: &Path) -> Result<()> {
        let mut args: Vec<OsString> = vec!["a".into(), "-y".into()];
        args.extend(self.create_args.iter().map(OsString::from));
        args.push("--".into());
        args.push(archive.into());
        args.push(input.into());

        self.run_checked(args)?;
        Ok(())
    }

    fn list_archive(&self, archive: &Path) -> Result<SizePair> {
        let output = self.run_checked(vec!["l".into(), "--".into(), archive.into()])?;
        let sizes = parse_listing(&output.stdout)?;
        debug!(
            "Listing of {}: {} -> {} bytes",
            archive.display(),
            sizes.original,
            sizes.compressed
        );
        Ok(sizes)
    }
}

/// First of [`CANDIDATE_PROGRAMS`] that can be started.
pub fn detect_program<R: ProcessRunner>(runner: &R) -> Result<String> {
    for candidate in CANDIDATE_PROGRAMS {
        if runner.run(candidate, &[]).is_ok() {
            return Ok(candidate.to_string());
        }
    }
    Err(Error::Other(
        "Neither '7z', '7zz' nor '7za' is available. Install 7-Zip or set compressor.program."
            .to_string(),
    ))
}
