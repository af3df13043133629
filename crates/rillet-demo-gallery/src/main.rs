#![forbid(unsafe_code)]

//! Scripted tour of the gallery: one session driven through all three
//! pages, each pass and the final store logged. `RUST_LOG=debug` shows the
//! cache and handler activity underneath.

use std::thread;
use std::time::Duration;

use rillet_demo_gallery::{gallery, pages};
use rillet_runtime::{App, PageError, PassReport, Session, UserEvent};
use rillet_state::Value;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), PageError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = gallery();
    let mut session = app.open_session();
    tracing::info!(session = %session.id(), "tour starting");

    // Fundamentals: defaults first, then both synced controls.
    drive(&app, &mut session, UserEvent::Rerun)?;
    drive(
        &app,
        &mut session,
        UserEvent::WidgetChanged {
            key: "_local_threshold".to_owned(),
            value: Value::Int(75),
        },
    )?;
    drive(
        &app,
        &mut session,
        UserEvent::WidgetChanged {
            key: "_local_group".to_owned(),
            value: Value::Str("B".to_owned()),
        },
    )?;

    // Architecture: the edits arrive through the global keys.
    drive(
        &app,
        &mut session,
        UserEvent::Navigate {
            slug: pages::architecture::SLUG.to_owned(),
        },
    )?;
    drive(&app, &mut session, UserEvent::Clicked { key: "_add_five".to_owned() })?;
    drive(&app, &mut session, UserEvent::Clicked { key: "_add_current".to_owned() })?;
    drive(&app, &mut session, UserEvent::Clicked { key: "_subtract_one".to_owned() })?;

    // Push the bounded slider high, then shrink its upper bound under it.
    drive(
        &app,
        &mut session,
        UserEvent::WidgetChanged {
            key: "_bounded".to_owned(),
            value: Value::Int(90),
        },
    )?;
    drive(
        &app,
        &mut session,
        UserEvent::WidgetChanged {
            key: "_bound_hi".to_owned(),
            value: Value::Int(60),
        },
    )?;

    // App design: caches fill on arrival; rerun until the background
    // total lands.
    drive(
        &app,
        &mut session,
        UserEvent::Navigate {
            slug: pages::app_design::SLUG.to_owned(),
        },
    )?;
    for _ in 0..40 {
        if session.store().get("global_rescore_status")?.as_str() == Some("ready") {
            break;
        }
        thread::sleep(Duration::from_millis(10));
        drive(&app, &mut session, UserEvent::Rerun)?;
    }

    log_store(&session);
    Ok(())
}

fn drive(app: &App, session: &mut Session, event: UserEvent) -> Result<PassReport, PageError> {
    let report = app.handle(session, event)?;
    tracing::info!(
        page = report.page.as_str(),
        pass = report.pass,
        evicted = report.evicted.len(),
        "pass complete"
    );
    Ok(report)
}

fn log_store(session: &Session) {
    for key in session.store().keys() {
        if let Some(value) = session.store().get_opt(key) {
            tracing::info!(key, %value, "store entry");
        }
    }
}
