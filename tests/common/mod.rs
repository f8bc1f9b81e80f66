//! Shared fixtures for integration tests.

#![allow(dead_code)]

use congo_server::{
    ActionRouter, Board, BoardSnapshot, CongoRules, Coordinate, DbError, DbErrorKind,
    GameRepository, Invitation, Persistence, PersistenceError, ResponseBuilder, RulesEngine,
    RulesError, Side,
};
use congo_server::{Action, ActionType};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;

/// How the scripted engine answers `process_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Moves the piece and accepts.
    Legal,
    /// Moves the piece, removes the opposing lion and accepts.
    LegalCapturesLion,
    /// Clears the origin and the opposing lion without placing the piece,
    /// then accepts.
    VanishingCapture,
    /// Scribbles on the board, then refuses.
    Illegal,
    /// Scribbles on the board, then faults.
    Fault,
}

/// Rules engine with scripted move answers, backed by the real rules for
/// everything else. Counts concurrent `process_move` calls.
#[derive(Debug)]
pub struct ScriptedEngine {
    rules: CongoRules,
    initial: Option<Board>,
    script: Mutex<Script>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(script: Script) -> Self {
        Self::with_delay(script, Duration::ZERO)
    }

    pub fn with_delay(script: Script, delay: Duration) -> Self {
        Self {
            rules: CongoRules::new(),
            initial: None,
            script: Mutex::new(script),
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Starts every match from `board` instead of the standard setup.
    pub fn with_initial(mut self, board: Board) -> Self {
        self.initial = Some(board);
        self
    }

    pub fn set_script(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RulesEngine for ScriptedEngine {
    fn initialize(&self) -> Board {
        self.initial.clone().unwrap_or_else(|| self.rules.initialize())
    }

    fn snapshot(&self, board: &Board) -> BoardSnapshot {
        self.rules.snapshot(board)
    }

    fn lion_in_castle(&self, board: &Board, coordinate: Coordinate) -> bool {
        self.rules.lion_in_castle(board, coordinate)
    }

    fn find_active_player(&self, board: &Board, coordinate: Coordinate) -> Option<Side> {
        self.rules.find_active_player(board, coordinate)
    }

    fn process_move(&self, moves: &[Coordinate], board: &mut Board) -> Result<bool, RulesError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let script = *self.script.lock().unwrap();
        let origin = moves[0];
        let landing = moves[moves.len() - 1];
        let result = match script {
            Script::Legal | Script::LegalCapturesLion => {
                let piece = board.set(origin, None);
                if script == Script::LegalCapturesLion {
                    let mover = piece.map(|p| p.side).unwrap_or(Side::PlayerOne);
                    if let Some(lion) = board.find_lion(mover.opponent()) {
                        board.set(lion, None);
                    }
                }
                board.set(landing, piece);
                Ok(true)
            }
            Script::VanishingCapture => {
                let mover = board.set(origin, None).map(|p| p.side).unwrap_or(Side::PlayerOne);
                if let Some(lion) = board.find_lion(mover.opponent()) {
                    board.set(lion, None);
                }
                Ok(true)
            }
            Script::Illegal => {
                board.set(origin, None);
                Ok(false)
            }
            Script::Fault => {
                board.set(origin, None);
                Err(RulesError::new("scripted fault"))
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Persistence whose every call fails in the store.
#[derive(Debug, Default)]
pub struct BrokenPersistence;

impl BrokenPersistence {
    fn fail<T>() -> Result<T, PersistenceError> {
        Err(DbError::new(DbErrorKind::Connection, "disk on fire").into())
    }
}

impl Persistence for BrokenPersistence {
    fn register_user(&self, _action: &Action) -> Result<(), PersistenceError> {
        Self::fail()
    }

    fn unregister_user(&self, _action: &Action) -> Result<(), PersistenceError> {
        Self::fail()
    }

    fn attempt_login(&self, _action: &Action) -> Result<String, PersistenceError> {
        Self::fail()
    }

    fn search_user(&self, _action: &Action) -> Result<bool, PersistenceError> {
        Self::fail()
    }

    fn send_game_invitation(&self, _action: &Action) -> Result<Invitation, PersistenceError> {
        Self::fail()
    }

    fn pending_invitation(&self, _action: &Action) -> Result<Option<Invitation>, PersistenceError> {
        Self::fail()
    }

    fn respond_to_invitation(
        &self,
        _action: &Action,
        _accepted: bool,
    ) -> Result<Invitation, PersistenceError> {
        Self::fail()
    }
}

/// Creates a migrated repository in a temporary file. The file handle must
/// stay in scope to keep the database alive.
pub fn temp_repository() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::open(db_path).expect("Failed to open repository");
    (db_file, repo)
}

/// Router over a temporary database and the given engine.
pub fn router_with(engine: Arc<dyn RulesEngine>) -> (NamedTempFile, ActionRouter) {
    let (db_file, repo) = temp_repository();
    let router = ActionRouter::new(Arc::new(repo), engine, ResponseBuilder::default());
    (db_file, router)
}

/// Router over a temporary database and the real rules.
pub fn router() -> (NamedTempFile, ActionRouter) {
    router_with(Arc::new(CongoRules::new()))
}

pub fn at(row: usize, col: usize) -> Coordinate {
    Coordinate::from_row_col(row, col).expect("on board")
}

pub fn begin_match(one: &str, two: &str) -> Action {
    Action {
        player_one_name: Some(one.to_string()),
        player_two_name: Some(two.to_string()),
        ..Action::new(ActionType::RequestBeginNewMatch)
    }
}

pub fn move_action(match_id: &str, player: &str, moves: Vec<Coordinate>) -> Action {
    Action {
        match_id: Some(match_id.to_string()),
        player_name: Some(player.to_string()),
        piece_id: Some("piece".to_string()),
        desired_moves: moves,
        ..Action::new(ActionType::RequestMoves)
    }
}

pub fn user_action(kind: ActionType, name: &str, email: &str) -> Action {
    Action {
        user_name: Some(name.to_string()),
        user_email: Some(email.to_string()),
        ..Action::new(kind)
    }
}

/// Starts a match through the router and returns its id.
pub fn start(router: &ActionRouter, one: &str, two: &str) -> String {
    let update = router.route(begin_match(one, two));
    update.match_id.expect("match id")
}
