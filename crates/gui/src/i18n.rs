use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ru,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(1); // 1=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        0 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Language from a settings code ("ru" / "en")
pub fn lang_from_code(code: &str) -> Lang {
    if code.eq_ignore_ascii_case("ru") {
        Lang::Ru
    } else {
        Lang::En
    }
}

pub fn lang_code(l: Lang) -> &'static str {
    match l {
        Lang::Ru => "ru",
        Lang::En => "en",
    }
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.reset_camera" => if ru { "Сбросить камеру  Home" } else { "Reset camera  Home" },
        "menu.language" => if ru { "Язык" } else { "Language" },
        "menu.settings" => if ru { "Настройки" } else { "Settings" },
        "menu.settings_window" => if ru { "Параметры..." } else { "Preferences..." },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        // ── Height panel ────────────────────────────────────
        "height.title" => if ru { "Здание" } else { "Building" },
        "height.label" => if ru { "Высота" } else { "Height" },
        "height.value" => if ru { "Текущая высота" } else { "Current height" },
        "height.triangles" => if ru { "Треугольников" } else { "Triangles" },
        "height.corners" => if ru { "Углов" } else { "Corners" },
        "height.self_intersects" => if ru {
            "Контур самопересекается, грани могут быть неверными"
        } else {
            "Outline crosses itself; faces may be wrong"
        },

        // ── Status bar ──────────────────────────────────────
        "status.points" => if ru { "Точек" } else { "Points" },
        "status.closed" => if ru { "Контур замкнут" } else { "Outline closed" },
        "status.open" => if ru { "Контур открыт" } else { "Outline open" },
        "status.tile_loading" => if ru { "Загрузка тайла..." } else { "Loading tile..." },
        "status.tile_failed" => if ru { "Тайл недоступен" } else { "Tile unavailable" },
        "status.tile_off" => if ru { "Тайлы отключены" } else { "Tiles off" },

        // ── Hints ───────────────────────────────────────────
        "hint.first_point" => if ru {
            "Кликните по карте, чтобы начать контур"
        } else {
            "Click the map to start an outline"
        },
        "hint.next_point" => if ru {
            "Добавляйте точки; клик рядом с первой замыкает контур"
        } else {
            "Add points; click near the first one to close"
        },
        "hint.orbit" => if ru {
            "ЛКМ — вращение, ПКМ — сдвиг, колесо — масштаб"
        } else {
            "Left drag orbits, right drag pans, scroll zooms"
        },

        // ── Settings ────────────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },
        "settings.grid" => if ru { "Сетка" } else { "Grid" },
        "settings.grid_visible" => if ru { "Показывать сетку" } else { "Show grid" },
        "settings.grid_size" => if ru { "Размер ячейки" } else { "Cell size" },
        "settings.grid_range" => if ru { "Количество линий" } else { "Grid lines" },
        "settings.grid_opacity" => if ru { "Прозрачность" } else { "Opacity" },

        "settings.viewport" => if ru { "Вьюпорт" } else { "Viewport" },
        "settings.bg_color" => if ru { "Цвет фона" } else { "Background color" },
        "settings.ground_color" => if ru { "Цвет земли" } else { "Ground color" },
        "settings.outline_color" => if ru { "Цвет контура" } else { "Outline color" },

        "settings.camera" => if ru { "Камера" } else { "Camera" },
        "settings.damping" => if ru { "Затухание" } else { "Damping" },

        "settings.tiles" => if ru { "Карта" } else { "Map tile" },
        "settings.tiles_enabled" => if ru {
            "Загружать тайл при запуске"
        } else {
            "Fetch tile at startup"
        },
        "settings.tile_url" => if ru { "Шаблон URL" } else { "URL template" },

        "settings.ui" => if ru { "Интерфейс" } else { "Interface" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },

        "settings.apply" => if ru { "Применить" } else { "Apply" },
        "settings.reset" => if ru { "Сбросить" } else { "Reset" },
        "settings.close" => if ru { "Закрыть" } else { "Close" },
        "settings.restart_note" => if ru {
            "Изменения камеры и карты вступят в силу после перезапуска"
        } else {
            "Camera and tile changes apply after restart"
        },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}
