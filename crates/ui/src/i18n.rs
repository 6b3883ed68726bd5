//! Built-in string tables. Unknown keys fall back to English, then to the
//! key itself.

/// Languages with a table, as `(code, native name)`.
pub const LANGUAGES: [(&str, &str); 3] = [("en", "English"), ("it", "Italiano"), ("es", "Español")];

const EN: &[(&str, &str)] = &[
    ("home", "Home"),
    ("about", "About"),
    ("experience", "Experience"),
    ("not_found", "Not found"),
    ("welcome_message", "Welcome to my corner of the web"),
    ("about_page", "About Page"),
    ("about_body", "Developer, tinkerer, occasional writer. This site is where the quests get logged."),
    ("experience_loading", "Loading experience…"),
    ("experience_title", "Quest log"),
    ("experience_close", "Close"),
    ("experience_present", "present"),
    ("experience_visit", "Visit"),
    ("experience_empty", "No experience to show"),
    ("experience_failed", "Could not load the experience data"),
    ("experience_all", "All"),
    ("experience_skills", "Skills"),
    ("experience_open", "Open file…"),
    ("view_timeline", "Timeline"),
    ("view_tree", "Tree"),
    ("change_language", "Change language"),
    ("search_language", "Search language…"),
    ("theme_to_light", "Light mode"),
    ("theme_to_dark", "Dark mode"),
    ("theme_auto", "Auto theme"),
    ("cursor_toggle", "Click it!"),
    ("cursor_unavailable", "Needs hardware acceleration"),
    ("not_found_message", "The page you are looking for does not exist"),
    ("go_home", "Go back home"),
];

const IT: &[(&str, &str)] = &[
    ("home", "Home"),
    ("about", "Chi sono"),
    ("experience", "Esperienza"),
    ("not_found", "Non trovata"),
    ("welcome_message", "Benvenuto nel mio angolo del web"),
    ("about_page", "Pagina Chi sono"),
    ("about_body", "Sviluppatore, smanettone, scrittore occasionale. Qui vengono registrate le quest."),
    ("experience_loading", "Caricamento esperienza…"),
    ("experience_title", "Diario delle quest"),
    ("experience_close", "Chiudi"),
    ("experience_present", "oggi"),
    ("experience_visit", "Visita"),
    ("experience_empty", "Nessuna esperienza da mostrare"),
    ("experience_failed", "Impossibile caricare i dati"),
    ("experience_all", "Tutte"),
    ("experience_skills", "Competenze"),
    ("experience_open", "Apri file…"),
    ("view_timeline", "Cronologia"),
    ("view_tree", "Albero"),
    ("change_language", "Cambia lingua"),
    ("search_language", "Cerca lingua…"),
    ("theme_to_light", "Tema chiaro"),
    ("theme_to_dark", "Tema scuro"),
    ("theme_auto", "Tema automatico"),
    ("cursor_toggle", "Cliccami!"),
    ("cursor_unavailable", "Richiede l'accelerazione hardware"),
    ("not_found_message", "La pagina che cerchi non esiste"),
    ("go_home", "Torna alla home"),
];

const ES: &[(&str, &str)] = &[
    ("home", "Inicio"),
    ("about", "Sobre mí"),
    ("experience", "Experiencia"),
    ("not_found", "No encontrada"),
    ("welcome_message", "Bienvenido a mi rincón de la web"),
    ("about_page", "Página Sobre mí"),
    ("about_body", "Desarrollador, inquieto, escritor ocasional. Aquí se registran las misiones."),
    ("experience_loading", "Cargando experiencia…"),
    ("experience_title", "Diario de misiones"),
    ("experience_close", "Cerrar"),
    ("experience_present", "actualidad"),
    ("experience_visit", "Visitar"),
    ("experience_empty", "No hay experiencia que mostrar"),
    ("experience_failed", "No se pudieron cargar los datos"),
    ("experience_all", "Todas"),
    ("experience_skills", "Habilidades"),
    ("experience_open", "Abrir archivo…"),
    ("view_timeline", "Cronología"),
    ("view_tree", "Árbol"),
    ("change_language", "Cambiar idioma"),
    ("search_language", "Buscar idioma…"),
    ("theme_to_light", "Modo claro"),
    ("theme_to_dark", "Modo oscuro"),
    ("theme_auto", "Tema automático"),
    ("cursor_toggle", "¡Haz clic!"),
    ("cursor_unavailable", "Requiere aceleración por hardware"),
    ("not_found_message", "La página que buscas no existe"),
    ("go_home", "Volver al inicio"),
];

fn table(lang: &str) -> &'static [(&'static str, &'static str)] {
    match lang {
        "it" => IT,
        "es" => ES,
        _ => EN,
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translate `key` into `lang`.
pub fn t<'a>(lang: &str, key: &'a str) -> &'a str {
    lookup(table(lang), key)
        .or_else(|| lookup(EN, key))
        .unwrap_or(key)
}

pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |&(_, name)| name)
}

/// Options of `offered` whose code or native name contains `query`,
/// case-insensitively.
pub fn filter_languages<'a>(offered: &'a [String], query: &str) -> Vec<(&'a str, &'a str)> {
    let query = query.trim().to_lowercase();
    offered
        .iter()
        .map(|code| (code.as_str(), language_name(code)))
        .filter(|(code, name)| {
            query.is_empty() || code.contains(&query) || name.to_lowercase().contains(&query)
        })
        .collect()
}
