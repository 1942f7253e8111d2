//! Exhibit commands: save, show, list, search

use anyhow::Result;
use cli_lib::{Exhibits, NewExhibit};
use owo_colors::OwoColorize;

/// Save an exhibit and report its number
pub fn save(exhibits: &Exhibits, new: NewExhibit) -> Result<()> {
    let exhibit = exhibits.save(new)?;
    println!("{} Exhibit number {} saved.", "✓".green(), exhibit.id.to_string().yellow());
    Ok(())
}

/// Display a single exhibit
pub fn show(exhibits: &Exhibits, owner_id: u64, number: u64) -> Result<()> {
    let Some(exhibit) = exhibits.get(owner_id, number)? else {
        println!("{}", "Exhibit not found.".yellow());
        return Ok(());
    };

    println!("{} {}", "Exhibit n.".bold(), exhibit.id.to_string().yellow().bold());
    println!("{} {}", "Author:    ".dimmed(), exhibit.author_name.cyan());
    println!("{} {}", "Link:      ".dimmed(), exhibit.message_link());
    if let Some(url) = &exhibit.attachment_url {
        println!("{} {}", "Attachment:".dimmed(), url);
    }
    println!();
    println!("{}", exhibit.content);
    Ok(())
}

/// List every exhibit of an owner
pub fn list(exhibits: &Exhibits, owner_id: u64) -> Result<()> {
    let all = exhibits.list(owner_id)?;
    if all.is_empty() {
        println!("{}", "No exhibits saved.".dimmed());
        return Ok(());
    }

    for exhibit in &all {
        let first_line = exhibit.content.lines().next().unwrap_or("");
        println!(
            "{:>4}  {}  {}",
            exhibit.id.to_string().yellow(),
            exhibit.author_name.cyan(),
            first_line
        );
    }
    println!("\n{} exhibits", all.len());
    Ok(())
}

/// Print autocomplete choices for `current`
pub fn search(exhibits: &Exhibits, owner_id: u64, current: &str) -> Result<()> {
    for choice in exhibits.autocomplete(owner_id, current)? {
        println!("{}", choice.name);
    }
    Ok(())
}
