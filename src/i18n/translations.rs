//! Translation tables

/// All user-visible strings for one language
#[derive(Debug)]
pub struct Translations {
    pub app_name: &'static str,
    pub footer_text: &'static str,
    pub tab_generate: &'static str,
    pub tab_edit: &'static str,

    pub gen_label_vision: &'static str,
    pub gen_placeholder: &'static str,
    pub gen_label_ratio: &'static str,
    pub gen_btn_generate: &'static str,
    pub gen_waiting: &'static str,
    pub gen_error_prompt: &'static str,
    pub gen_download_alt: &'static str,

    pub edit_source_label: &'static str,
    pub edit_source_placeholder: &'static str,
    pub edit_btn_load: &'static str,
    pub edit_drop_hint: &'static str,
    pub edit_quick_title: &'static str,
    pub qa_remove_bg: &'static str,
    pub qa_upscale: &'static str,
    pub qa_color: &'static str,
    pub edit_custom_label: &'static str,
    pub edit_custom_placeholder: &'static str,
    pub edit_btn_edit: &'static str,
    pub edit_error_upload: &'static str,
    pub edit_error_not_image: &'static str,
    pub edit_label_original: &'static str,
    pub edit_label_edited: &'static str,
    pub edit_waiting: &'static str,

    pub tool_text_overlay: &'static str,
    pub tool_text_label: &'static str,
    pub tool_text_placeholder: &'static str,
    pub tool_font_label: &'static str,
    pub tool_color_label: &'static str,
    pub tool_size_label: &'static str,
    pub tool_pos_label: &'static str,
    pub tool_btn_add_text: &'static str,
    pub tool_btn_save: &'static str,
    pub tool_error_text: &'static str,
    /// Position labels in row-major order, top-left first
    pub positions: [&'static str; 9],

    pub saved_to: &'static str,
    pub download_error_empty: &'static str,
    pub dismiss: &'static str,

    pub loading_gen: &'static [&'static str],
    pub loading_edit: &'static [&'static str],
}

pub static EN: Translations = Translations {
    app_name: "Imagine Art",
    footer_text: "Powered by Gemini. Created with imagination.",
    tab_generate: "Generate",
    tab_edit: "Edit",

    gen_label_vision: "Describe your vision",
    gen_placeholder: "A neon-lit city street at night, rain reflections, cinematic",
    gen_label_ratio: "Aspect ratio",
    gen_btn_generate: "Generate",
    gen_waiting: "Your masterpiece will appear here",
    gen_error_prompt: "Please enter a prompt.",
    gen_download_alt: "Download image",

    edit_source_label: "Source image",
    edit_source_placeholder: "Path to a PNG, JPG or WEBP file",
    edit_btn_load: "Load",
    edit_drop_hint: "PNG, JPG, WEBP",
    edit_quick_title: "Quick actions",
    qa_remove_bg: "Remove BG",
    qa_upscale: "Upscale",
    qa_color: "Change color",
    edit_custom_label: "Or describe your edit",
    edit_custom_placeholder: "Add a red scarf to the cat",
    edit_btn_edit: "Edit image",
    edit_error_upload: "Please upload an image and enter an instruction.",
    edit_error_not_image: "Please choose an image file.",
    edit_label_original: "Original",
    edit_label_edited: "Edited",
    edit_waiting: "The edited image will appear here",

    tool_text_overlay: "Text overlay",
    tool_text_label: "Text",
    tool_text_placeholder: "Your caption",
    tool_font_label: "Font",
    tool_color_label: "Color",
    tool_size_label: "Size",
    tool_pos_label: "Position",
    tool_btn_add_text: "Add text",
    tool_btn_save: "Save image",
    tool_error_text: "Please enter some text.",
    positions: [
        "Top left", "Top center", "Top right",
        "Middle left", "Center", "Middle right",
        "Bottom left", "Bottom center", "Bottom right",
    ],

    saved_to: "Saved to",
    download_error_empty: "Nothing to download yet.",
    dismiss: "Dismiss",

    loading_gen: &[
        "Mixing the colors...",
        "Sketching the composition...",
        "Adding the finishing touches...",
        "Consulting the muses...",
    ],
    loading_edit: &[
        "Studying your image...",
        "Applying the magic...",
        "Blending the pixels...",
        "Almost there...",
    ],
};

pub static RU: Translations = Translations {
    app_name: "Imagine Art",
    footer_text: "Работает на Gemini. Создано с воображением.",
    tab_generate: "Создать",
    tab_edit: "Редактировать",

    gen_label_vision: "Опишите свою идею",
    gen_placeholder: "Неоновая улица ночью, отражения дождя, кинематографично",
    gen_label_ratio: "Соотношение сторон",
    gen_btn_generate: "Создать",
    gen_waiting: "Ваш шедевр появится здесь",
    gen_error_prompt: "Пожалуйста, введите описание.",
    gen_download_alt: "Скачать изображение",

    edit_source_label: "Исходное изображение",
    edit_source_placeholder: "Путь к файлу PNG, JPG или WEBP",
    edit_btn_load: "Загрузить",
    edit_drop_hint: "PNG, JPG, WEBP",
    edit_quick_title: "Быстрые действия",
    qa_remove_bg: "Убрать фон",
    qa_upscale: "Увеличить",
    qa_color: "Сменить цвет",
    edit_custom_label: "Или опишите правку",
    edit_custom_placeholder: "Добавь коту красный шарф",
    edit_btn_edit: "Редактировать",
    edit_error_upload: "Загрузите изображение и введите инструкцию.",
    edit_error_not_image: "Выберите файл изображения.",
    edit_label_original: "Оригинал",
    edit_label_edited: "Результат",
    edit_waiting: "Отредактированное изображение появится здесь",

    tool_text_overlay: "Наложение текста",
    tool_text_label: "Текст",
    tool_text_placeholder: "Ваша подпись",
    tool_font_label: "Шрифт",
    tool_color_label: "Цвет",
    tool_size_label: "Размер",
    tool_pos_label: "Положение",
    tool_btn_add_text: "Добавить текст",
    tool_btn_save: "Сохранить",
    tool_error_text: "Введите текст.",
    positions: [
        "Вверху слева", "Вверху по центру", "Вверху справа",
        "Посередине слева", "По центру", "Посередине справа",
        "Внизу слева", "Внизу по центру", "Внизу справа",
    ],

    saved_to: "Сохранено в",
    download_error_empty: "Пока нечего скачивать.",
    dismiss: "Закрыть",

    loading_gen: &[
        "Смешиваем краски...",
        "Набрасываем композицию...",
        "Добавляем последние штрихи...",
        "Советуемся с музами...",
    ],
    loading_edit: &[
        "Изучаем изображение...",
        "Творим магию...",
        "Смешиваем пиксели...",
        "Почти готово...",
    ],
};

pub static UZ: Translations = Translations {
    app_name: "Imagine Art",
    footer_text: "Gemini asosida ishlaydi. Tasavvur bilan yaratilgan.",
    tab_generate: "Yaratish",
    tab_edit: "Tahrirlash",

    gen_label_vision: "G'oyangizni tasvirlang",
    gen_placeholder: "Tungi neon ko'cha, yomg'ir aksi, kinematografik",
    gen_label_ratio: "Tomonlar nisbati",
    gen_btn_generate: "Yaratish",
    gen_waiting: "Sizning asaringiz shu yerda paydo bo'ladi",
    gen_error_prompt: "Iltimos, tavsif kiriting.",
    gen_download_alt: "Rasmni yuklab olish",

    edit_source_label: "Manba rasm",
    edit_source_placeholder: "PNG, JPG yoki WEBP fayl yo'li",
    edit_btn_load: "Yuklash",
    edit_drop_hint: "PNG, JPG, WEBP",
    edit_quick_title: "Tezkor amallar",
    qa_remove_bg: "Fonni olib tashlash",
    qa_upscale: "Kattalashtirish",
    qa_color: "Rangni o'zgartirish",
    edit_custom_label: "Yoki tahrirni tasvirlang",
    edit_custom_placeholder: "Mushukka qizil sharf qo'sh",
    edit_btn_edit: "Tahrirlash",
    edit_error_upload: "Iltimos, rasm yuklang va ko'rsatma kiriting.",
    edit_error_not_image: "Iltimos, rasm faylini tanlang.",
    edit_label_original: "Asl",
    edit_label_edited: "Tahrirlangan",
    edit_waiting: "Tahrirlangan rasm shu yerda paydo bo'ladi",

    tool_text_overlay: "Matn qo'shish",
    tool_text_label: "Matn",
    tool_text_placeholder: "Sizning yozuvingiz",
    tool_font_label: "Shrift",
    tool_color_label: "Rang",
    tool_size_label: "O'lcham",
    tool_pos_label: "Joylashuv",
    tool_btn_add_text: "Matn qo'shish",
    tool_btn_save: "Saqlash",
    tool_error_text: "Iltimos, matn kiriting.",
    positions: [
        "Yuqori chap", "Yuqori markaz", "Yuqori o'ng",
        "O'rta chap", "Markaz", "O'rta o'ng",
        "Pastki chap", "Pastki markaz", "Pastki o'ng",
    ],

    saved_to: "Saqlandi",
    download_error_empty: "Hozircha yuklab olinadigan rasm yo'q.",
    dismiss: "Yopish",

    loading_gen: &[
        "Ranglar aralashtirilmoqda...",
        "Kompozitsiya chizilmoqda...",
        "So'nggi ishlovlar berilmoqda...",
        "Ilhom izlanmoqda...",
    ],
    loading_edit: &[
        "Rasm o'rganilmoqda...",
        "Sehr qo'llanilmoqda...",
        "Piksellar aralashtirilmoqda...",
        "Deyarli tayyor...",
    ],
};
