use anyhow::{Context, Result};
use postboard::calendar::{CalendarGrid, MonthCursor};
use postboard::cli::print_help;
use postboard::config::Config;
use postboard::context::StandardContext;
use postboard::filter::FilterOptions;
use postboard::model::{DayKey, Platform, Post, PostPatch, ReviewStatus, SeverityClass};
use postboard::storage::LocalStorage;
use postboard::store::PostStore;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;

const BINARY_NAME: &str = "postboard";

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || take_flag(&mut args, &["-h", "--help", "help"]) {
        print_help(BINARY_NAME);
        return Ok(());
    }

    let root = take_value(&mut args, &["-r", "--root"])?.map(PathBuf::from);
    let verbose = take_flag(&mut args, &["-v", "--verbose"]);
    if args.is_empty() {
        print_help(BINARY_NAME);
        return Ok(());
    }

    let ctx = StandardContext::new(root);
    let config = Config::load_or_default(&ctx)?;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        config.log_level_filter()
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let mut store = PostStore::from_posts(LocalStorage::load(&ctx)?);
    let command = args.remove(0);

    match command.as_str() {
        "list" => {
            let day = take_value(&mut args, &["--day"])?
                .map(|d| d.parse::<DayKey>())
                .transpose()
                .context("--day expects YYYY-MM-DD")?;
            let filters = FilterArgs::parse(&mut args, &config)?;
            let mut options = filters.options();
            options.selected_day = day;
            print_board(&store.board(&options));
        }
        "calendar" => {
            let filters = FilterArgs::parse(&mut args, &config)?;
            let cursor = match args.first() {
                Some(m) => MonthCursor::parse(m).context("calendar expects YYYY-MM")?,
                None => MonthCursor::today(),
            };
            print_calendar(&store, cursor, &filters.options());
        }
        "add" => {
            let owner = take_value(&mut args, &["--owner"])?
                .unwrap_or_else(|| config.default_owner.clone());
            let at = take_value(&mut args, &["--at"])?;
            if let Some(text) = &at {
                ensure_local_time(text)?;
            }
            let mut tags = Vec::new();
            while let Some(tag) = take_value(&mut args, &["--tag"])? {
                tags.push(tag);
            }
            let mut post = Post::new(&owner, &config.default_platforms);
            PostPatch {
                scheduled_at: Some(at),
                tags: Some(tags),
                notes: Some(args.join(" ")),
                ..PostPatch::default()
            }
            .apply_to(&mut post);
            println!("{}", post.id);
            store.add_post(post);
            LocalStorage::save(&ctx, &store.posts)?;
        }
        "status" => {
            let [id, label] = positional::<2>(&args, "status <id> <label>")?;
            let status = ReviewStatus::from_label(&label);
            if let ReviewStatus::Unknown(raw) = &status {
                anyhow::bail!("Unknown status '{}'", raw);
            }
            update(&mut store, &ctx, &id, |s| s.set_status(&id, status))?;
        }
        "schedule" => {
            let [id, at] = positional::<2>(&args, "schedule <id> <YYYY-MM-DDThh:mm|none>")?;
            let at = if at == "none" { None } else { Some(at) };
            if let Some(text) = &at {
                ensure_local_time(text)?;
            }
            update(&mut store, &ctx, &id, |s| s.schedule(&id, at.as_deref()))?;
        }
        "caption" => {
            let [id, platform] = positional::<2>(&args, "caption <id> <platform> <text>")?;
            let platform = parse_platform(&platform)?;
            let caption = args[2..].join(" ");
            update(&mut store, &ctx, &id, |s| {
                let post = s.get_mut(&id)?;
                post.entry_mut(platform).caption = caption;
                Some(post.clone())
            })?;
        }
        "enable" | "disable" => {
            let [id, platform] = positional::<2>(&args, "enable|disable <id> <platform>")?;
            let platform = parse_platform(&platform)?;
            let enabled = command == "enable";
            update(&mut store, &ctx, &id, |s| {
                let post = s.get_mut(&id)?;
                post.entry_mut(platform).enabled = enabled;
                Some(post.clone())
            })?;
        }
        "delete" => {
            let [id] = positional::<1>(&args, "delete <id>")?;
            update(&mut store, &ctx, &id, |s| s.delete_post(&id))?;
        }
        "duplicate" => {
            let [id] = positional::<1>(&args, "duplicate <id>")?;
            let copy = store
                .duplicate_post(&id)
                .ok_or_else(|| anyhow::anyhow!("No post with id {}", id))?;
            println!("{}", copy.id);
            LocalStorage::save(&ctx, &store.posts)?;
        }
        "tags" => {
            for (tag, count) in store.all_tags() {
                println!("{:<24} {}", tag, count);
            }
        }
        "export" => {
            println!("{}", LocalStorage::export_json(&store.posts)?);
        }
        "import" => {
            let [file] = positional::<1>(&args, "import <file.json>")?;
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file))?;
            let (added, replaced) = store.merge_import(LocalStorage::import_json(&json)?);
            LocalStorage::save(&ctx, &store.posts)?;
            println!("Imported {} new, {} replaced", added, replaced);
        }
        other => {
            eprintln!("Unknown command '{}'. See '{} --help'.", other, BINARY_NAME);
            std::process::exit(2);
        }
    }

    Ok(())
}

struct FilterArgs {
    status: Option<ReviewStatus>,
    platform: Option<Platform>,
    scheduled_only: bool,
    search: String,
}

impl FilterArgs {
    fn parse(args: &mut Vec<String>, config: &Config) -> Result<Self> {
        let status = take_value(args, &["--status"])?.map(|s| ReviewStatus::from_label(&s));
        let platform = take_value(args, &["--platform"])?
            .map(|p| parse_platform(&p))
            .transpose()?;
        let scheduled_only = take_flag(args, &["--scheduled"]) || config.scheduled_only;
        let search = take_value(args, &["--search"])?.unwrap_or_default();
        Ok(Self {
            status,
            platform,
            scheduled_only,
            search,
        })
    }

    fn options(&self) -> FilterOptions<'_> {
        FilterOptions {
            status: self.status.clone(),
            platform: self.platform,
            scheduled_only: self.scheduled_only,
            selected_day: None,
            search_term: &self.search,
        }
    }
}

fn update<F>(store: &mut PostStore, ctx: &StandardContext, id: &str, f: F) -> Result<()>
where
    F: FnOnce(&mut PostStore) -> Option<Post>,
{
    f(store).ok_or_else(|| anyhow::anyhow!("No post with id {}", id))?;
    LocalStorage::save(ctx, &store.posts)
}

fn ensure_local_time(text: &str) -> Result<()> {
    if !postboard::model::schedule::parse_local(text).is_valid() {
        anyhow::bail!("'{}' is not a YYYY-MM-DDThh:mm local time", text);
    }
    Ok(())
}

fn parse_platform(s: &str) -> Result<Platform> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Unknown platform '{}'", s))
}

fn take_flag(args: &mut Vec<String>, names: &[&str]) -> bool {
    if let Some(pos) = args.iter().position(|a| names.contains(&a.as_str())) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn take_value(args: &mut Vec<String>, names: &[&str]) -> Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| names.contains(&a.as_str())) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        anyhow::bail!("{} expects a value", args[pos]);
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn positional<const N: usize>(args: &[String], usage: &str) -> Result<[String; N]> {
    if args.len() < N {
        anyhow::bail!("usage: {} {}", BINARY_NAME, usage);
    }
    Ok(std::array::from_fn(|i| args[i].clone()))
}

fn print_board(posts: &[&Post]) {
    if posts.is_empty() {
        println!("No posts match.");
        return;
    }
    for post in posts {
        let when = post.scheduled_at.as_deref().unwrap_or("unscheduled");
        let platforms: Vec<&str> = post.enabled_platforms().map(|p| p.label()).collect();
        println!(
            "{}  {:<16} {:<12} {:<12} {}",
            post.id,
            when,
            post.status.label(),
            post.owner,
            platforms.join(",")
        );
        if !post.notes.is_empty() {
            println!("    {}", post.notes);
        }
    }
}

fn print_calendar(store: &PostStore, cursor: MonthCursor, options: &FilterOptions) {
    let buckets = store.calendar_buckets(options);
    let grid = CalendarGrid::build(cursor);

    println!("{}", cursor.first_day().format("%B %Y"));
    println!("  Mo    Tu    We    Th    Fr    Sa    Su");
    for row in grid.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| {
                let day = cell.date.format("%d").to_string();
                let day = if cell.in_month {
                    day
                } else {
                    format!("({})", day.trim_start_matches('0'))
                };
                match buckets.get(&cell.day) {
                    Some(b) => format!(
                        "{:>4}{}{}",
                        day,
                        b.post_count,
                        SeverityClass::from_severity(b.max_severity()).mark()
                    ),
                    None => format!("{:>4}  ", day),
                }
            })
            .collect();
        println!("{}", line.join(""));
    }

    println!();
    for cell in grid.cells.iter().filter(|c| c.in_month) {
        if let Some(bucket) = buckets.get(&cell.day) {
            let badges: Vec<String> = bucket
                .platform_severity
                .iter()
                .map(|(p, sev)| format!("{} {}", p.label(), SeverityClass::from_severity(*sev).mark()))
                .collect();
            println!(
                "{}  {} post(s)  {}",
                bucket.day,
                bucket.post_count,
                badges.join("  ")
            );
        }
    }
}
