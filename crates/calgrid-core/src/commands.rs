use anyhow::Context;
use tracing::{debug, instrument};

use crate::cli::{Command, UnitArg};
use crate::config::Config;
use crate::date::{CalendarDate, DayInfo, LooseDate, calendar_date_string};
use crate::render::Renderer;
use crate::window::Window;

#[instrument(skip(cfg, renderer, command))]
pub fn dispatch(
    cfg: &Config,
    renderer: &mut Renderer,
    command: Command,
) -> anyhow::Result<()> {
    let today = CalendarDate::today_utc();
    let locale = cfg.display_locale();

    match command {
        Command::Month { date, six_weeks } => {
            let date = resolve_date(date.as_deref(), today)?;
            renderer.print_month_grid(date, today, &locale, cfg.first_day, six_weeks)
        }
        Command::Week { date } => {
            let date = resolve_date(date.as_deref(), today)?;
            renderer.print_week_strip(date, today, &locale, cfg.first_day)
        }
        Command::Info { date } => {
            let date = resolve_date(Some(&date), today)?;
            let info = DayInfo::from_date(date);
            let json = serde_json::to_string_pretty(&info)
                .context("failed serializing day info")?;
            println!("{json}");
            Ok(())
        }
        Command::Window {
            date,
            past,
            future,
            unit,
            json,
        } => {
            let date = resolve_date(date.as_deref(), today)?;
            let window = match unit {
                UnitArg::Month => Window::months(date, past, future),
                UnitArg::Week => Window::weeks(date, cfg.first_day, past.max(future)),
            };
            debug!(len = window.len(), "generated window");

            if json {
                let markings: Vec<String> =
                    window.anchors().iter().map(|a| a.to_marking()).collect();
                let out = serde_json::to_string_pretty(&markings)
                    .context("failed serializing window")?;
                println!("{out}");
            } else {
                for anchor in window.anchors() {
                    println!("{anchor}");
                }
            }
            Ok(())
        }
    }
}

/// CLI dates go through the loose normalizer, so `2021-06-15`,
/// `2021/06/15` and `15 Jun 2021` all work; anything else is a hard
/// error surfaced to the user.
fn resolve_date(raw: Option<&str>, today: CalendarDate) -> anyhow::Result<CalendarDate> {
    let Some(raw) = raw else {
        return Ok(today);
    };
    let marking = calendar_date_string(&LooseDate::Text(raw.to_string()))
        .with_context(|| format!("could not understand date: {raw}"))?;
    CalendarDate::from_iso(&marking)
        .with_context(|| format!("normalized date did not parse: {marking}"))
}
