use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Best-effort "copy text to clipboard".
///
/// Returns whether the text was handed to the system clipboard. Failure is
/// never an error; callers decide whether to mention it.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy(&self, text: &str) -> bool;
}

/// Pipes the text into the first clipboard helper that accepts it.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    commands: Vec<(String, Vec<String>)>,
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self::with_commands(vec![
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
            ("pbcopy", vec![]),
            ("clip.exe", vec![]),
        ])
    }
}

impl CommandClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commands(commands: Vec<(&str, Vec<&str>)>) -> Self {
        Self {
            commands: commands
                .into_iter()
                .map(|(program, args)| {
                    (program.to_string(), args.into_iter().map(str::to_string).collect())
                })
                .collect(),
        }
    }

    async fn try_command(program: &str, args: &[String], text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        Ok(child.wait().await?.success())
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn copy(&self, text: &str) -> bool {
        for (program, args) in &self.commands {
            match Self::try_command(program, args, text).await {
                Ok(true) => {
                    debug!("Copied {} bytes with {}", text.len(), program);
                    return true;
                }
                Ok(false) => debug!("{} exited with failure", program),
                Err(e) => debug!("{} unavailable: {}", program, e),
            }
        }
        false
    }
}
