// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.

pub fn print_help(binary_name: &str) {
    println!(
        "Postboard v{} - Content approval board for social media posts",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--verbose] <command>", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    list [filters] [--day YYYY-MM-DD]        Board view");
    println!("    calendar [YYYY-MM] [filters]             Month grid with per-day status");
    println!("    add [--owner X] [--at T] [--tag T]... <notes>");
    println!("    status <id> <label>                      Draft | In review | Needs fixes | Approved");
    println!("    schedule <id> <YYYY-MM-DDThh:mm|none>");
    println!("    caption <id> <platform> <text>");
    println!("    enable <id> <platform>");
    println!("    disable <id> <platform>");
    println!("    delete <id>");
    println!("    duplicate <id>");
    println!("    tags                                     Tags in use with counts");
    println!("    export                                   Write all posts as JSON to stdout");
    println!("    import <file.json>                       Merge posts from an export file");
    println!();
    println!("FILTERS:");
    println!("    --status <label>      Only posts in this review state");
    println!("    --platform <id>       instagram, facebook, linkedin, x, tiktok");
    println!("    --scheduled           Only posts with a schedule");
    println!("    --search <text>       Case-insensitive text search");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Debug logging on stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("CALENDAR MARKS:");
    println!("    !  needs fixes    ?  in review    +  approved    ·  draft");
}
