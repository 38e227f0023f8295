#[cfg(test)]
mod ui_rendering_tests {
    use crate::admin::AdminView;
    use crate::app::App;
    use crate::config::Config;
    use crate::gateway::GatewayHandle;
    use crate::leaderboard::LeaderboardView;
    use crate::models::fixtures::{metadata, question, result, review_question};
    use crate::models::{
        AppState, GatewayRequest, GatewayResponse, LeaderboardResponse, Placeholder,
        QuestionsResponse, SubmitResponse,
    };
    use crate::session::{NO_QUESTIONS_MESSAGE, QuizSession, SELECT_ANSWER_MESSAGE};
    use crate::store::{ADMIN_UNLOCKED_KEY, KeyValueStore, LAST_RESULT_KEY, MemoryStore, PLAYER_NAME_KEY};
    use crate::timer::testing::ManualClock;
    use crate::ui;
    use ratatui::{Frame, Terminal, backend::TestBackend};
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;

    const WIDTH: u16 = 120;
    const HEIGHT: u16 = 40;

    /// Render into a test backend and return the screen, one row per line.
    fn render(draw: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        terminal.draw(draw).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .chunks(WIDTH as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded_session(
        name: Option<&str>,
        store: &MemoryStore,
    ) -> (QuizSession, UnboundedReceiver<GatewayRequest>) {
        let (handle, mut rx) = GatewayHandle::channel();
        if let Some(name) = name {
            store.set(PLAYER_NAME_KEY, name).unwrap();
        }
        let mut session = QuizSession::new(handle, Arc::new(ManualClock::new(0)), store);
        session.load_questions();
        let ticket = rx.try_recv().unwrap().ticket();
        let mut meta = metadata(3);
        meta.placeholders.push(Placeholder {
            id: "q9".into(),
            label: "Frage zu Hannah Arendt".into(),
            status: "coming_soon".into(),
        });
        session.handle_response(
            GatewayResponse::Questions {
                ticket,
                result: Ok(QuestionsResponse {
                    metadata: meta,
                    items: vec![question("q1", false), question("q2", true), question("q3", false)],
                    message: None,
                }),
            },
            store,
        );
        (session, rx)
    }

    #[test]
    fn test_menu_shows_items_and_player() {
        let screen = render(|f| ui::draw_menu(f, 1, Some("Anna")));
        assert!(screen.contains("Quiz starten"));
        assert!(screen.contains("> Leaderboard"));
        assert!(screen.contains("Angemeldet als: Anna"));

        let screen = render(|f| ui::draw_menu(f, 0, None));
        assert!(screen.contains("Noch kein Name gespeichert"));
    }

    #[test]
    fn test_question_screen() {
        let store = MemoryStore::new();
        let (mut session, _rx) = loaded_session(Some("Anna"), &store);
        session.select_option("q1", "B");

        let screen = render(|f| ui::draw_quiz(f, &session));
        assert!(screen.contains("Frage 1/3"));
        assert!(screen.contains("00:00"));
        assert!(screen.contains("Frage q1"));
        assert!(screen.contains("(•) 2. Antwort B"));
        assert!(screen.contains("( ) 1. Antwort A"));
        assert!(screen.contains("15 geplant – 12 in Arbeit"));
    }

    #[test]
    fn test_multi_question_uses_checkboxes() {
        let store = MemoryStore::new();
        let (mut session, _rx) = loaded_session(Some("Anna"), &store);
        session.go_next();
        session.select_option("q2", "A");
        session.select_option("q2", "C");

        let screen = render(|f| ui::draw_quiz(f, &session));
        assert!(screen.contains("Mehrere Antworten möglich"));
        assert!(screen.contains("[x] 1. Antwort A"));
        assert!(screen.contains("[ ] 2. Antwort B"));
        assert!(screen.contains("[x] 3. Antwort C"));
    }

    #[test]
    fn test_validation_message_is_visible() {
        let store = MemoryStore::new();
        let (mut session, _rx) = loaded_session(Some("Anna"), &store);
        session.submit_quiz();

        let screen = render(|f| ui::draw_quiz(f, &session));
        assert!(screen.contains(SELECT_ANSWER_MESSAGE));
    }

    #[test]
    fn test_intro_with_name_prompt() {
        let store = MemoryStore::new();
        let (session, _rx) = loaded_session(None, &store);

        let screen = render(|f| ui::draw_quiz(f, &session));
        assert!(screen.contains("Willkommen"));
        assert!(screen.contains("Frage zu Hannah Arendt"));
        assert!(screen.contains("Unter welchem Namen"));
    }

    #[test]
    fn test_intro_without_questions_shows_message() {
        let store = MemoryStore::new();
        store.set(PLAYER_NAME_KEY, "Anna").unwrap();
        let (handle, mut rx) = GatewayHandle::channel();
        let mut session = QuizSession::new(handle, Arc::new(ManualClock::new(0)), &store);
        session.load_questions();
        let ticket = rx.try_recv().unwrap().ticket();
        session.handle_response(
            GatewayResponse::Questions {
                ticket,
                result: Ok(QuestionsResponse {
                    metadata: metadata(0),
                    items: Vec::new(),
                    message: None,
                }),
            },
            &store,
        );

        let screen = render(|f| ui::draw_quiz(f, &session));
        assert!(screen.contains("Willkommen"));
        assert!(screen.contains(NO_QUESTIONS_MESSAGE));
    }

    #[test]
    fn test_submitted_screen() {
        let store = MemoryStore::new();
        let (mut session, mut rx) = loaded_session(Some("Anna"), &store);
        for id in ["q1", "q2", "q3"] {
            session.select_option(id, "A");
        }
        session.submit_quiz();
        let ticket = rx.try_recv().unwrap().ticket();

        let own = result("new", "Anna", 4, 5, 125_000, 2);
        session.handle_response(
            GatewayResponse::Submitted {
                ticket,
                result: Ok(SubmitResponse {
                    metadata: metadata(5),
                    result: own.clone(),
                    leaderboard: vec![result("top", "Ben", 5, 5, 90_000, 1), own],
                    review: vec![review_question("q1", &["A"], &["B"])],
                    storage: None,
                }),
            },
            &store,
        );

        let screen = render(|f| ui::draw_quiz(f, &session));
        assert!(screen.contains("4/5 richtig"));
        assert!(screen.contains("Zeit: 02:05"));
        assert!(screen.contains("Platz 2"));
        assert!(screen.contains("Ben"));
        assert!(screen.contains("Nicht ganz richtig"));
    }

    #[test]
    fn test_leaderboard_highlight_and_error() {
        let store = MemoryStore::new();
        store.set(LAST_RESULT_KEY, "r2").unwrap();
        let (handle, mut rx) = GatewayHandle::channel();
        let mut view = LeaderboardView::new(handle, &store, None);
        view.load();

        let screen = render(|f| ui::draw_leaderboard(f, &view));
        assert!(screen.contains("Leaderboard wird geladen"));

        let ticket = rx.try_recv().unwrap().ticket();
        view.handle_response(GatewayResponse::Leaderboard {
            ticket,
            result: Ok(LeaderboardResponse {
                metadata: metadata(8),
                entries: vec![
                    result("r1", "Anna", 8, 8, 60_000, 1),
                    result("r2", "Ben", 7, 8, 65_000, 2),
                ],
            }),
        });

        let screen = render(|f| ui::draw_leaderboard(f, &view));
        assert!(screen.contains("8 Fragen live"));
        let ben_row = screen.lines().find(|l| l.contains("Ben")).unwrap();
        assert!(ben_row.contains("★"));
        assert!(ben_row.contains("01:05"));
        let anna_row = screen.lines().find(|l| l.contains("Anna")).unwrap();
        assert!(!anna_row.contains("★"));
    }

    #[test]
    fn test_admin_password_is_masked() {
        let store = MemoryStore::new();
        let (handle, _rx) = GatewayHandle::channel();
        let mut view = AdminView::new(handle, &store, "adminglg");
        view.password_input = "geheim".into();

        let screen = render(|f| ui::draw_admin(f, &view));
        assert!(screen.contains("******"));
        assert!(!screen.contains("geheim"));
    }

    #[test]
    fn test_admin_confirm_popup() {
        let store = MemoryStore::new();
        store.set(ADMIN_UNLOCKED_KEY, "1").unwrap();
        let (handle, mut rx) = GatewayHandle::channel();
        let mut view = AdminView::new(handle, &store, "adminglg");
        let ticket = rx.try_recv().unwrap().ticket();
        view.handle_response(GatewayResponse::Leaderboard {
            ticket,
            result: Ok(LeaderboardResponse {
                metadata: metadata(8),
                entries: vec![result("r1", "Anna", 8, 8, 60_000, 1)],
            }),
        });
        view.request_remove_selected();

        let screen = render(|f| ui::draw_admin(f, &view));
        assert!(screen.contains("Eintrag von Anna löschen?"));

        view.cancel_confirm();
        view.request_clear();
        let screen = render(|f| ui::draw_admin(f, &view));
        assert!(screen.contains("Wirklich alle Einträge löschen?"));
    }

    #[test]
    fn test_quit_confirmation() {
        let screen = render(ui::draw_quit_confirmation);
        assert!(screen.contains("Quiz abbrechen"));
        assert!(screen.contains("Ja (zum Menü)"));
    }

    #[test]
    fn test_app_draw_dispatches_on_state() {
        let (handle, _rx) = GatewayHandle::channel();
        let config = Config::from_lookup(|_| None).unwrap();
        let mut app = App::new(
            Box::new(MemoryStore::new()),
            handle,
            Arc::new(ManualClock::new(0)),
            &config,
        );

        let screen = render(|f| ui::draw(f, &app));
        assert!(screen.contains("Ethik-Quiz"));

        app.open_quiz();
        let screen = render(|f| ui::draw(f, &app));
        assert!(screen.contains("Quizfragen werden geladen"));

        app.state = AppState::QuizQuitConfirm;
        let screen = render(|f| ui::draw(f, &app));
        assert!(screen.contains("Quiz abbrechen"));
    }
}
