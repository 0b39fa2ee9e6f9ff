use autoshift_common::keycodes::key_range;
use autoshift_config::{
    binary_to_bytes, bytes_to_binary, compiler::SettingsConfig, keycodes, pretty_compile,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use anyhow::{anyhow, Result};

/// Compile and inspect auto-shift settings
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List keycode names
    KeycodesList(ListKeycodesArgs),
    /// Show the code of a keycode expression such as `a`, `S-1` or `lt(1, a)`
    Keycode(KeycodeArgs),
    /// Validate a settings file
    Validate(ValidateArgs),
    /// Compile a settings file into a binary settings image
    Compile(CompileArgs),
    /// Show the effective settings of a settings file or binary image
    Show(ShowArgs),
}

#[derive(Copy, Clone, ValueEnum)]
enum CodeType {
    Basic,
    Modifier,
    AutoShift,
}

#[derive(Args)]
struct ListKeycodesArgs {
    /// Include the keycode hex value
    #[clap(long, short)]
    verbose: bool,

    /// Sort results by keycode; Defaults to sorting by name
    #[clap(long, short)]
    sort_by_keycode: bool,

    /// Limit to keycode type
    #[clap(long, short)]
    code_type: Option<CodeType>,

    /// Only list key names that contain pattern (case insensitive). If pattern starts with 0x then
    /// key names matching the key code will be shown.
    #[clap()]
    pattern: Option<String>,
}

#[derive(Args)]
struct KeycodeArgs {
    /// The keycode expression
    #[clap()]
    expression: String,
}

#[derive(Args)]
struct ValidateArgs {
    /// Print the compiled image
    #[clap(long, short)]
    verbose: bool,

    /// The settings file to validate
    #[clap()]
    file: PathBuf,
}

#[derive(Args)]
struct CompileArgs {
    /// Where to write the image; defaults to the input with a `.bin` extension
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// The settings file to compile
    #[clap()]
    file: PathBuf,
}

#[derive(Args)]
struct ShowArgs {
    /// A settings file, or a compiled image when it ends in `.bin`
    #[clap()]
    file: PathBuf,
}

fn compile_error(file: &Path, err: &str) -> Result<()> {
    Err(anyhow!(
        "Failed to compile \"{}\"!\n    {}",
        file.display(),
        err
    ))
}

fn compile_file(file: &Path, src: &str) -> Result<SettingsConfig> {
    pretty_compile(file, src).map_err(|err| {
        if err.span.is_none() {
            anyhow!("{err}")
        } else {
            // already reported with the source excerpt
            anyhow!("")
        }
    })
}

fn validate(args: &ValidateArgs) -> Result<()> {
    let file = &args.file;

    match fs::read_to_string(file) {
        Ok(src) => {
            let conf = compile_file(file, &src)?;
            if args.verbose {
                let image = conf.serialize();
                println!("binary size: {}", image.len() * 2);
                println!(
                    "image:       {}",
                    image
                        .iter()
                        .map(|w| format!("{w:04x}"))
                        .collect::<Vec<_>>()
                        .join(" ")
                );
            }
            Ok(())
        }

        Err(err) => compile_error(file, err.to_string().as_str()),
    }
}

fn compile(args: &CompileArgs) -> Result<()> {
    let file = &args.file;
    let src = match fs::read_to_string(file) {
        Ok(src) => src,
        Err(err) => return compile_error(file, err.to_string().as_str()),
    };
    let conf = compile_file(file, &src)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| file.with_extension("bin"));
    let bytes = binary_to_bytes(&conf.serialize());
    fs::write(&output, &bytes)?;
    log::info!("wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

fn show(args: &ShowArgs) -> Result<()> {
    let file = &args.file;
    let conf = if file.extension().is_some_and(|e| e == "bin") {
        let bytes = fs::read(file)?;
        SettingsConfig::deserialize(&bytes_to_binary(&bytes)?)?
    } else {
        let src = fs::read_to_string(file)?;
        compile_file(file, &src)?
    };
    for (name, value) in conf.describe() {
        println!("{name:<26} = {value}");
    }
    Ok(())
}

fn keycode(args: &KeycodeArgs) -> Result<()> {
    let code = keycodes::parse_keycode(&args.expression).map_err(|e| anyhow!(e))?;
    println!("0x{code:04x}: {}", keycodes::keycode_to_string(code));
    Ok(())
}

fn list_keycodes(args: &ListKeycodesArgs) -> Result<()> {
    let iter = keycodes::keycodes_iter().filter(|d| match args.code_type {
        Some(CodeType::Basic) => key_range::is_basic(d.code) && !key_range::is_modifier(d.code),
        Some(CodeType::Modifier) => key_range::is_modifier(d.code),
        Some(CodeType::AutoShift) => key_range::is_auto_shift_admin(d.code),
        None => true,
    });
    let mut codes = if let Some(pattern) = &args.pattern {
        let pattern = pattern.to_lowercase();
        if let Some(hex) = pattern.strip_prefix("0x") {
            let pattern = u16::from_str_radix(hex, 16)?;
            iter.filter(|p| p.code == pattern).collect::<Vec<_>>()
        } else {
            let pattern = pattern.as_str();
            iter.filter(|p| p.name.to_lowercase().contains(pattern))
                .collect::<Vec<_>>()
        }
    } else {
        iter.collect::<Vec<_>>()
    };
    if args.sort_by_keycode {
        codes.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.name.cmp(b.name)));
    } else {
        codes.sort_by_key(|k| k.name);
    }
    if args.verbose {
        if args.sort_by_keycode {
            for group in codes.chunk_by(|a, b| a.code == b.code) {
                let names = group.iter().map(|d| d.name).collect::<Vec<_>>();
                verbose_print(group[0].code, &names.join(", "));
            }
        } else {
            for d in codes {
                verbose_print(d.code, d.name);
            }
        }
    } else {
        for d in codes {
            println!("{}", d.name);
        }
    }
    Ok(())
}

fn verbose_print(code: u16, name: &str) {
    println!("{code:02X}: {name}");
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = run(&cli);

    if let Err(message) = result {
        let message = message.to_string();
        if !message.is_empty() {
            eprintln!("{message}");
        }
        process::exit(1);
    };
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Validate(args) => validate(args),
        Commands::Compile(args) => compile(args),
        Commands::Show(args) => show(args),
        Commands::Keycode(args) => keycode(args),
        Commands::KeycodesList(args) => list_keycodes(args),
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod test;
