use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use itertools::Itertools;

use regex_groups::{
    Token, TokenClass, execute, find_group_in_match, find_group_in_regex, tokenize,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Regular expression pattern to inspect
    pattern: String,

    /// Regex flags, JS-style (i, m, s; g/y/u are accepted and ignored)
    #[arg(short, long, default_value = "")]
    flags: String,

    /// 1-based capturing group to locate
    #[arg(short, long)]
    group: Option<usize>,

    /// Sample text to match the pattern against
    #[arg(short, long)]
    sample: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tokens = tokenize(&args.pattern);
    println!("{}", tokens.iter().map(styled).join(""));
    if tokens.iter().any(|t| t.class == TokenClass::Error) {
        eprintln!("Pattern contains lexical errors (shown inverted).");
    }

    let Some(group) = args.group else {
        return Ok(());
    };

    let Some(pos) = find_group_in_regex(&args.pattern, group) else {
        eprintln!("Group {group} not found in pattern.");
        process::exit(1);
    };
    println!(
        "Group {group} in pattern: {}..{}  {}",
        pos.start,
        pos.end,
        args.pattern[pos.start..pos.end].bold()
    );

    let Some(sample) = args.sample.as_deref() else {
        return Ok(());
    };

    let m = execute(&args.pattern, &args.flags, sample)
        .context("pattern failed to compile")?;
    let Some(m) = m else {
        eprintln!("Pattern does not match the sample.");
        process::exit(1);
    };

    match find_group_in_match(&args.pattern, &args.flags, sample, &m, group, &pos)? {
        Some(range) => {
            println!(
                "Group {group} in sample:  {}..{}  {}{}{}",
                range.start,
                range.end,
                &sample[..range.start],
                sample[range.start..range.end].negative(),
                &sample[range.end..]
            );
        }
        None => {
            eprintln!("Group {group} did not participate in the match (or is quantified).");
            process::exit(1);
        }
    }
    Ok(())
}

/// One coloured span per token class.
fn styled(token: &Token) -> String {
    let text = token.text.as_str();
    let styled = match token.class {
        TokenClass::Bracket => text.cyan().bold(),
        TokenClass::Keyword => text.magenta(),
        TokenClass::Atom => text.green(),
        TokenClass::Number => text.yellow(),
        TokenClass::RangeInfo => text.blue(),
        TokenClass::Error => text.red().negative(),
        TokenClass::Plain => text.stylize(),
    };
    styled.to_string()
}
