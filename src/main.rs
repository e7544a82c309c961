//! Pixel Stego - hide text in the pixels of an image.
//!
//! Reads cover images in any supported format and always writes lossless PNG.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pixel_stego::container::{load_image, save_image};
use pixel_stego::{PngCodec, StegoConfig, Steganographer};
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pixel-stego")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Hide text messages in image pixels",
    long_about = "Embeds a length-prefixed message in the least-significant bits of an image's RGB channels, optionally encrypted with AES-256-GCM."
)]
struct Cli {
    /// JSON configuration file (KDF and limits)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how many bytes an image can hide
    Capacity {
        /// Cover image
        image: PathBuf,
    },

    /// Hide a message in an image
    Encode {
        /// Cover image
        cover: PathBuf,

        /// Output PNG
        output: PathBuf,

        /// Message text
        #[arg(long, conflicts_with = "input")]
        message: Option<String>,

        /// File containing the message text
        #[arg(long, conflicts_with = "message")]
        input: Option<PathBuf>,

        /// Encrypt the message with a password
        #[arg(long)]
        encrypt: bool,
    },

    /// Recover a hidden message
    Decode {
        /// Image containing a hidden message
        image: PathBuf,

        /// The message was encrypted with a password
        #[arg(long)]
        encrypt: bool,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Describe the hidden frame without decrypting it
    Inspect {
        /// Image containing a hidden message
        image: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixel_stego=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let steg = Steganographer::new(load_config(cli.config.as_deref())?)?;

    match cli.command {
        Commands::Capacity { image } => cmd_capacity(&steg, &image),

        Commands::Encode {
            cover,
            output,
            message,
            input,
            encrypt,
        } => cmd_encode(&steg, &cover, &output, message, input, encrypt),

        Commands::Decode {
            image,
            encrypt,
            output,
        } => cmd_decode(&steg, &image, encrypt, output),

        Commands::Inspect { image, json } => cmd_inspect(&steg, &image, json),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StegoConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config = StegoConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?;
            tracing::debug!(?config, "loaded config");
            Ok(config)
        }
        None => Ok(StegoConfig::default()),
    }
}

/// Prompt on the terminal, falling back to a line of stdin when there is no
/// TTY. The fallback is refused once stdin has been read for the message.
fn prompt_password(prompt: &str, stdin_consumed: bool) -> anyhow::Result<String> {
    match rpassword::prompt_password(prompt) {
        Ok(password) => Ok(password),
        Err(_) => {
            eprint!("{}", prompt);
            io::stderr().flush()?;
            read_password_line(&mut io::stdin().lock(), stdin_consumed)
        }
    }
}

fn read_password_line(input: &mut impl BufRead, stdin_consumed: bool) -> anyhow::Result<String> {
    if stdin_consumed {
        bail!("no terminal for the password prompt and stdin already holds the message; use --message or --input");
    }
    let mut password = String::new();
    if input.read_line(&mut password)? == 0 {
        bail!("no password provided on stdin");
    }
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

fn cmd_capacity(steg: &Steganographer, path: &Path) -> anyhow::Result<()> {
    let image = load_image(&PngCodec, path)
        .with_context(|| format!("loading {}", path.display()))?;

    println!("Image:       {} x {}", image.width(), image.height());
    println!("Capacity:    {} bytes", pixel_stego::capacity(image.width(), image.height()));
    println!(
        "Usable:      {} bytes",
        steg.available_capacity(image.width(), image.height())
    );

    Ok(())
}

fn cmd_encode(
    steg: &Steganographer,
    cover: &Path,
    output: &Path,
    message: Option<String>,
    input: Option<PathBuf>,
    encrypt: bool,
) -> anyhow::Result<()> {
    let stdin_consumed = message.is_none() && input.is_none();
    let secret = match (message, input) {
        (Some(text), None) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        (Some(_), Some(_)) => unreachable!(),
    };

    let password = if encrypt {
        let password = prompt_password("Password: ", stdin_consumed)?;
        let confirm = prompt_password("Confirm password: ", stdin_consumed)?;
        if password != confirm {
            bail!("passwords do not match");
        }
        Some(password)
    } else {
        None
    };

    let image = load_image(&PngCodec, cover)
        .with_context(|| format!("loading {}", cover.display()))?;
    let stego = steg.encode(&image, &secret, password.as_deref())?;
    save_image(&PngCodec, &stego, output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Hid {} bytes in {} ({} bytes available)",
        secret.len(),
        output.display(),
        steg.available_capacity(image.width(), image.height())
    );

    Ok(())
}

fn cmd_decode(
    steg: &Steganographer,
    path: &Path,
    encrypt: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let password = if encrypt {
        Some(prompt_password("Password: ", false)?)
    } else {
        None
    };

    let image = load_image(&PngCodec, path)
        .with_context(|| format!("loading {}", path.display()))?;
    let secret = steg.decode(&image, password.as_deref())?;

    match output {
        Some(out) => {
            std::fs::write(&out, secret.as_bytes())?;
            println!("Wrote {} bytes to {}", secret.len(), out.display());
        }
        None => {
            io::stdout().write_all(secret.as_bytes())?;
            println!();
        }
    }

    Ok(())
}

fn cmd_inspect(steg: &Steganographer, path: &Path, json: bool) -> anyhow::Result<()> {
    let image = load_image(&PngCodec, path)
        .with_context(|| format!("loading {}", path.display()))?;
    let info = steg.inspect(&image)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Hidden Frame");
    println!("============");
    println!("Payload:     {} bytes", info.payload_len);
    println!("Capacity:    {} bytes", info.capacity);
    println!("Plain text:  {}", if info.is_utf8 { "yes" } else { "no" });
    if let Some(blob) = &info.blob {
        println!();
        println!("If encrypted:");
        println!("  Salt:      {}", hex::encode(blob.salt));
        println!("  Nonce:     {}", hex::encode(blob.nonce));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_password_fallback_refused_after_stdin_message() {
        let mut stdin = Cursor::new(Vec::new());
        assert!(read_password_line(&mut stdin, true).is_err());

        let mut stdin = Cursor::new(b"pw123\n".to_vec());
        assert!(read_password_line(&mut stdin, true).is_err());
    }

    #[test]
    fn test_password_fallback_reads_line() {
        let mut stdin = Cursor::new(b"pw123\r\nrest".to_vec());
        assert_eq!(read_password_line(&mut stdin, false).unwrap(), "pw123");
    }

    #[test]
    fn test_password_fallback_rejects_eof() {
        let mut stdin = Cursor::new(Vec::new());
        assert!(read_password_line(&mut stdin, false).is_err());
    }
}
