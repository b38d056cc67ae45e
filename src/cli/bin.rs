use base64::{alphabet, engine, engine::general_purpose, Engine as _};
use clap::{Args, Parser, Subcommand};
use glome::{GlomeBuilder, Session};
use std::error::Error;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use x25519_dalek::{PublicKey, StaticSecret};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Glome,
}

#[derive(Args)]
struct TagArgs {
    /// Path to secret key
    #[arg(short, long, value_name = "FILE")]
    key: PathBuf,
    /// Path to peer's public key
    #[arg(short, long, value_name = "FILE")]
    peer: PathBuf,
    /// Message counter index
    #[arg(short, long, value_name = "n")]
    counter: Option<u8>,
}

#[derive(Args)]
struct VerifyArgs {
    /// Path to secret key
    #[arg(short, long, value_name = "FILE")]
    key: PathBuf,
    /// Path to peer's public key
    #[arg(short, long, value_name = "FILE")]
    peer: PathBuf,
    /// Message counter index
    #[arg(short, long, value_name = "n")]
    counter: Option<u8>,
    /// Minimum tag length in bytes
    ///
    /// Tags that decode to fewer bytes are rejected. Must be in [1..32].
    #[arg(long, value_name = "n", default_value_t = 8)]
    min_tag_length: usize,
    /// Tag to verify
    tag: String,
}

#[derive(Subcommand)]
enum Glome {
    /// Generate a new secret key and print it to stdout
    Genkey,
    /// Read a private key from stdin and write its public key to stdout
    Pubkey,
    /// Tag a message read from stdin
    Tag(TagArgs),
    /// Verify a message tag
    Verify(VerifyArgs),
}

type CommandResult = Result<(), Box<dyn Error>>;

fn genkey(stdout: &mut dyn io::Write) -> CommandResult {
    Ok(stdout.write_all(StaticSecret::random().as_bytes())?)
}

fn pubkey(stdin: &mut dyn io::Read, stdout: &mut dyn io::Write) -> CommandResult {
    let mut buf: [u8; 32] = [0; 32];
    stdin.read_exact(&mut buf)?;
    let sk: StaticSecret = buf.into();
    let pk: PublicKey = (&sk).into();

    Ok(writeln!(
        stdout,
        "glome-v1 {}",
        general_purpose::URL_SAFE.encode(pk.as_bytes())
    )?)
}

fn read_key(path: &PathBuf) -> Result<Vec<u8>, Box<dyn Error>> {
    Ok(fs::read(path).map_err(|e| format!("reading file {:?}: {}", path, e))?)
}

fn read_pub(path: &PathBuf) -> Result<Vec<u8>, Box<dyn Error>> {
    let pubkey = fs::read_to_string(path).map_err(|e| format!("reading file {:?}: {}", path, e))?;
    let b64 = match pubkey.strip_prefix("glome-v1 ") {
        Some(tail) => tail.trim_end(),
        None => return Err("unsupported public key version, expected 'glome-v1'".into()),
    };
    Ok(general_purpose::URL_SAFE
        .decode(b64)
        .map_err(|e| format!("decoding public key: {}", e))?)
}

fn session(key: &PathBuf, peer: &PathBuf, min_tag_length: usize) -> Result<Session, Box<dyn Error>> {
    Ok(GlomeBuilder::new(&read_pub(peer)?, min_tag_length)?
        .set_private_key(&read_key(key)?)?
        .build()?)
}

fn gentag(args: &TagArgs, stdin: &mut dyn io::Read, stdout: &mut dyn io::Write) -> CommandResult {
    let session = session(&args.key, &args.peer, glome::MAX_TAG_LENGTH)?;
    let ctr = args.counter.unwrap_or_default();
    let mut msg = Vec::new();
    stdin.read_to_end(&mut msg)?;

    let t = session.generate_tag(&msg, ctr)?;

    let encoded = general_purpose::URL_SAFE.encode(t);

    Ok(stdout.write_all(encoded.as_bytes())?)
}

fn verify(args: &VerifyArgs, stdin: &mut dyn io::Read) -> CommandResult {
    let session = session(&args.key, &args.peer, args.min_tag_length)?;
    let ctr = args.counter.unwrap_or_default();
    let mut msg = Vec::new();
    stdin.read_to_end(&mut msg)?;

    // We want to allow truncated tags, but not all truncations are valid
    // base64. A single encoded byte only holds 6 bits and can't be decoded
    // into a byte, so we need to ignore it by stripping it off.
    let mut tag_b64 = args.tag.clone();
    if tag_b64.len() % 4 == 1 {
        tag_b64.truncate(tag_b64.len() - 1);
    }

    // Truncation can cause trailing bits and missing padding if the truncated
    // length is not a multiple of 4. Make sure that the base64 engine can deal
    // with that.
    let permissive_config = engine::GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(engine::DecodePaddingMode::Indifferent);
    let permissive_engine = engine::GeneralPurpose::new(&alphabet::URL_SAFE, permissive_config);
    let tag = permissive_engine.decode(tag_b64)?;

    Ok(session.check_tag(&tag, &msg, ctr)?)
}

fn main() -> CommandResult {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let result = match &Cli::parse().command {
        Glome::Genkey => genkey(&mut io::stdout()),
        Glome::Pubkey => pubkey(&mut io::stdin(), &mut io::stdout()),
        Glome::Tag(tag_args) => gentag(tag_args, &mut io::stdin(), &mut io::stdout()),
        Glome::Verify(verify_args) => verify(verify_args, &mut io::stdin()),
    };
    if let Err(e) = &result {
        tracing::debug!(error = %e, "command failed");
    }
    result
}

#[cfg(test)]
#[path = "../vectors.rs"]
mod vectors;
