mod cli;
mod column_menu;
mod confirm;
mod data;
mod detail;
mod filter_menu;
mod float;
mod hint;
mod loading;
mod presets;
mod search;
mod state;
mod store;
mod terminal_check;
mod theme;
mod toast;

use crate::{
    cli::Args,
    data::read_records,
    float::Float,
    loading::LoadingFloat,
    state::App,
    store::RecordStore,
    theme::Theme,
};
use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, error, info};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::event::{self, Event, KeyCode},
};
use std::{fs::File, io::stdout, time::Duration};
use terminal_check::{draw_too_small_warning, is_too_small};

fn init_logging(args: &Args) -> Result<()> {
    let file = File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    simplelog::WriteLogger::init(LevelFilter::Debug, simplelog::Config::default(), file)?;
    Ok(())
}

fn restore_terminal(term: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    term.backend_mut().execute(LeaveAlternateScreen)?;
    term.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = <Args as clap::Parser>::parse();
    if let Err(e) = args.validate() {
        eprintln!("\n{e}");
        std::process::exit(1);
    }
    init_logging(&args)?;
    info!("opening {} as {:?}", args.read.display(), args.kind);

    // --- setup terminal
    let mut out = stdout();
    out.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut term = Terminal::new(CrosstermBackend::new(out))?;
    term.clear()?;

    // --- load records off the UI thread
    let path = args.read.clone();
    let loader = tokio::task::spawn_blocking(move || read_records(&path));
    let mut spinner = Float::new_absolute(
        Box::new(LoadingFloat::new(&format!("Reading {}", args.read.display()))),
        60,
        5,
    );
    let theme = Theme::default();
    while !loader.is_finished() {
        term.draw(|f| {
            let area = f.area();
            if is_too_small(area) {
                draw_too_small_warning(f, area);
            } else {
                spinner.draw(f, area, &theme);
            }
        })?;
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    loader.abort();
                    return restore_terminal(&mut term);
                }
            }
        }
    }

    let dataset = match loader.await? {
        Ok(dataset) => dataset,
        Err(e) => {
            restore_terminal(&mut term)?;
            error!("loading failed: {e:#}");
            return Err(e);
        }
    };
    info!("loaded {} records", dataset.records.len());

    let columns = presets::columns_for(args.kind, &dataset.fields);
    let records = dataset.records.clone();
    let store = (!args.read_only).then(|| RecordStore::new(args.read.clone(), dataset));

    // --- main app loop
    let mut app = App::new(&args, records, columns, store, tokio::runtime::Handle::current());
    // the UI loop blocks; delete handlers run on the other workers
    let res = tokio::task::block_in_place(|| app.run(&mut term));

    restore_terminal(&mut term)?;
    res
}
