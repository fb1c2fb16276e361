use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::table::Table;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DisplayStyle {
    Table,
    Json,
    Csv,
}

/// How a resource renders itself in table and csv output. Column order is
/// shared by both.
pub trait TerminalDisplay {
    fn titles() -> Vec<&'static str>;
    fn row(self) -> Vec<String>;
}

pub fn display_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}

pub fn display_list<T: Serialize + TerminalDisplay>(
    list: Vec<T>,
    style: DisplayStyle,
    headless: bool,
    csv_titles: Option<String>,
) -> Result<()> {
    match style {
        DisplayStyle::Table => {
            if list.is_empty() {
                println!("<empty list>");
                return Ok(());
            }
            let mut table = Table::with_capacity(list.len() + 1, headless);
            table.add(T::titles().iter().map(|s| s.to_string()).collect());
            for item in list {
                table.add(item.row());
            }
            table.show();
        }
        DisplayStyle::Csv => {
            let titles = T::titles();
            let selected: Vec<usize> = match csv_titles {
                Some(ref filter) => {
                    let filter: Vec<_> = filter.split(',').collect();
                    (0..titles.len())
                        .filter(|i| filter.contains(&titles[*i]))
                        .collect()
                }
                None => (0..titles.len()).collect(),
            };
            if selected.is_empty() {
                bail!("no csv column to display, available: {:?}", titles);
            }

            if !headless {
                let header: Vec<_> = selected.iter().map(|i| titles[*i]).collect();
                println!("{}", header.join(","));
            }
            for item in list {
                let row = item.row();
                let values: Vec<_> = selected.iter().map(|i| row[*i].as_str()).collect();
                println!("{}", values.join(","));
            }
        }
        DisplayStyle::Json => display_json(list)?,
    }

    Ok(())
}
