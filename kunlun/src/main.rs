//! Entry point for the kunlun poll client. Parses args, resolves a profile and
//! runs the poll loop (or a one-off history query).

use std::env;
use std::io::{self, Write};
use std::time::Duration;

use kunlun::app::{App, Output};
use kunlun::config::Settings;
use kunlun::profiles::{ProfileEntry, ProfileRequest, ProfileStore, ResolveProfile};
use kunlun::source::HttpSource;
use kunlun_engine::Granularity;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    profile: Option<String>,
    interval_ms: Option<u64>,
    save: bool,
    once: bool,
    json: bool,
    dry_run: bool,
    history: Option<u64>,
    level: Option<Granularity>,
}

const USAGE_FLAGS: &str = "[--profile NAME|-P NAME] [--save] [--interval MS|-i MS] [--once] [--json] [--history CLIENT_ID [--level seconds|minutes|hours]] [--dry-run] [http://HOST:PORT]";

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "kunlun".into());
    let usage = || format!("Usage: {prog} {USAGE_FLAGS}");
    let mut p = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage()),
            "--profile" | "-P" => p.profile = it.next(),
            "--interval" | "-i" => {
                let v = it.next().unwrap_or_default();
                p.interval_ms = Some(
                    v.parse()
                        .map_err(|_| format!("invalid interval '{v}'. {}", usage()))?,
                );
            }
            "--history" => {
                let v = it.next().unwrap_or_default();
                p.history = Some(
                    v.parse()
                        .map_err(|_| format!("invalid client id '{v}'. {}", usage()))?,
                );
            }
            "--level" => {
                let v = it.next().unwrap_or_default();
                p.level = Some(v.parse::<Granularity>()?);
            }
            "--save" => p.save = true,
            "--once" => p.once = true,
            "--json" => p.json = true,
            "--dry-run" => p.dry_run = true,
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        p.profile = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown flag '{arg}'. {}", usage()));
            }
            _ => {
                if p.url.is_none() {
                    p.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. {}", usage()));
                }
            }
        }
    }
    Ok(p)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let Some(entry) = resolve_entry(&parsed)? else {
        return Ok(());
    };

    if parsed.dry_run {
        println!("{}", entry.url);
        return Ok(());
    }

    let settings = Settings::from_env();
    let interval = Duration::from_millis(
        entry
            .interval_ms
            .unwrap_or(settings.interval.as_millis() as u64)
            .max(100),
    );
    let output = if parsed.json { Output::Json } else { Output::Text };
    let source = HttpSource::new(&entry.url, settings.http_timeout)?;
    let app = App::new(&settings, output).with_interval(interval);

    if let Some(client_id) = parsed.history {
        let level = parsed.level.unwrap_or(Granularity::Seconds);
        return app.history(&source, client_id, level).await;
    }
    app.run(&source, parsed.once).await
}

/// Turn flags and stored profiles into the connection to use, persisting new
/// or changed profiles along the way. `None` means the user aborted.
fn resolve_entry(parsed: &ParsedArgs) -> anyhow::Result<Option<ProfileEntry>> {
    let store = ProfileStore::default_location();
    let profiles_file = store.load();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        interval_ms: parsed.interval_ms,
    };
    let mut profiles_mut = profiles_file.clone();

    let entry = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(entry) => {
            // Possibly save if profile specified and --save or new entry
            if let Some(name) = parsed.profile.as_ref() {
                let write = match profiles_mut.get(name) {
                    // New profile: auto-save immediately
                    None => true,
                    Some(existing) if *existing != entry => {
                        parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ))
                    }
                    Some(_) => false,
                };
                if write && profiles_mut.upsert(name, entry.clone()) {
                    store.save(&profiles_mut)?;
                }
            }
            entry
        }
        ResolveProfile::Loaded(entry) => entry,
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|idx| *idx >= 1 && *idx <= names.len())
                .and_then(|idx| profiles_mut.get(&names[idx - 1]).cloned());
            match picked {
                Some(entry) => entry,
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter backend URL (http://HOST:PORT): ")?;
            if url.trim().is_empty() {
                return Ok(None);
            }
            let entry = ProfileEntry {
                url: url.trim().to_string(),
                interval_ms: parsed.interval_ms,
            };
            if profiles_mut.upsert(&name, entry.clone()) {
                store.save(&profiles_mut)?;
            }
            entry
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(entry))
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
