use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::error;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut requests: Vec<NetworkRequest> = Vec::new();

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::SeasonRankings),
        (_, Char('2'), _) => guard.update_tab(MenuItem::NationalRankings),
        (_, Char('3'), _) => guard.update_tab(MenuItem::PlayerStats),
        (_, Char('4'), _) => guard.update_tab(MenuItem::TeamMatches),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Player statistics: column cursor, sorting, extended columns
        (MenuItem::PlayerStats, Char('h') | KeyCode::Left, _) => {
            guard.state.stats.move_column_cursor(false)
        }
        (MenuItem::PlayerStats, Char('l') | KeyCode::Right, _) => {
            guard.state.stats.move_column_cursor(true)
        }
        (MenuItem::PlayerStats, Char('s') | KeyCode::Enter, _) => guard.state.stats.sort_by_cursor(),
        (MenuItem::PlayerStats, Char('x'), _) => guard.state.stats.toggle_extended(),

        // Team matches: top players panel
        (MenuItem::TeamMatches, KeyCode::Enter, _) => {
            requests.extend(guard.state.matches.open_top_players());
        }
        (MenuItem::TeamMatches, Char('m'), _) => requests.extend(guard.state.matches.cycle_map()),
        (MenuItem::TeamMatches, KeyCode::Esc, _) => {
            if guard.state.matches.top_players.is_open() {
                guard.state.matches.top_players.close();
            } else {
                let previous = guard.state.previous_tab;
                guard.update_tab(previous);
            }
        }

        // Nationals
        (MenuItem::NationalRankings, Char('i'), _) => {
            requests.push(guard.state.nationals.toggle_hide_qualified());
        }

        // Rankings and stats share filter and row keys
        (_, Char('d'), _) => requests.extend(guard.cycle_division(true)),
        (_, Char('D'), _) => requests.extend(guard.cycle_division(false)),
        (_, Char('g'), _) => requests.extend(guard.cycle_group(true)),
        (_, Char('G'), _) => requests.extend(guard.cycle_group(false)),
        (_, Char('j') | KeyCode::Down, _) => guard.move_selection(true),
        (_, Char('k') | KeyCode::Up, _) => guard.move_selection(false),
        (MenuItem::SeasonRankings | MenuItem::NationalRankings, KeyCode::Enter, _)
        | (MenuItem::PlayerStats, Char('t'), _) => requests.extend(guard.open_selected_team()),
        (_, Char('r'), _) => requests.extend(guard.reload_active_tab()),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    drop(guard);
    for request in requests {
        if let Err(e) = network_requests.send(request).await {
            error!("Failed to queue network request: {e}");
        }
    }
}
