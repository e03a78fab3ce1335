pub(crate) const TRAY_MENU_OPEN: &str = "tray_open";
pub(crate) const TRAY_MENU_RUN_AT_LOGIN: &str = "tray_run_at_login";
pub(crate) const TRAY_MENU_CHECK_UPDATES: &str = "tray_check_updates";
pub(crate) const TRAY_MENU_VISIT_REPOSITORY: &str = "tray_visit_repository";
pub(crate) const TRAY_MENU_ABOUT: &str = "tray_about";
pub(crate) const TRAY_MENU_QUIT: &str = "tray_quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrayMenuAction {
    OpenDashboard,
    ToggleRunAtLogin,
    CheckForUpdates,
    VisitRepository,
    About,
    Quit,
}

pub(crate) fn action_from_menu_id(menu_id: &str) -> Option<TrayMenuAction> {
    match menu_id {
        TRAY_MENU_OPEN => Some(TrayMenuAction::OpenDashboard),
        TRAY_MENU_RUN_AT_LOGIN => Some(TrayMenuAction::ToggleRunAtLogin),
        TRAY_MENU_CHECK_UPDATES => Some(TrayMenuAction::CheckForUpdates),
        TRAY_MENU_VISIT_REPOSITORY => Some(TrayMenuAction::VisitRepository),
        TRAY_MENU_ABOUT => Some(TrayMenuAction::About),
        TRAY_MENU_QUIT => Some(TrayMenuAction::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_from_menu_id_maps_all_known_actions() {
        assert_eq!(
            action_from_menu_id(TRAY_MENU_OPEN),
            Some(TrayMenuAction::OpenDashboard)
        );
        assert_eq!(
            action_from_menu_id(TRAY_MENU_RUN_AT_LOGIN),
            Some(TrayMenuAction::ToggleRunAtLogin)
        );
        assert_eq!(
            action_from_menu_id(TRAY_MENU_CHECK_UPDATES),
            Some(TrayMenuAction::CheckForUpdates)
        );
        assert_eq!(
            action_from_menu_id(TRAY_MENU_VISIT_REPOSITORY),
            Some(TrayMenuAction::VisitRepository)
        );
        assert_eq!(
            action_from_menu_id(TRAY_MENU_ABOUT),
            Some(TrayMenuAction::About)
        );
        assert_eq!(
            action_from_menu_id(TRAY_MENU_QUIT),
            Some(TrayMenuAction::Quit)
        );
    }

    #[test]
    fn action_from_menu_id_returns_none_for_unknown_menu_id() {
        assert_eq!(action_from_menu_id("unknown-menu"), None);
    }
}
