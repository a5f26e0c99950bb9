use serde::Serialize;

/// What the caller wants recommendations for.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationRequest {
    /// Guided by the user's quiz answers and a free-text preference summary.
    Quiz {
        quiz_answers: Vec<String>,
        preferences: String,
    },
    /// A handful of arbitrary existing titles.
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

pub const GUIDED_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 1800,
};

pub const RANDOM_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.9,
    max_tokens: 1500,
};

/// Only host the prompts allow cover images from.
pub const APPROVED_IMAGE_HOST: &str = "media.kitsu.app";

impl RecommendationRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Quiz { .. } => "quiz",
            Self::Random => "random",
        }
    }

    pub fn prompts(&self) -> PromptPair {
        match self {
            Self::Quiz {
                quiz_answers,
                preferences,
            } => build_quiz_prompts(quiz_answers, preferences),
            Self::Random => build_random_prompts(),
        }
    }

    pub fn generation_params(&self) -> GenerationParams {
        match self {
            Self::Quiz { .. } => GUIDED_PARAMS,
            Self::Random => RANDOM_PARAMS,
        }
    }
}

const FIELD_RULES: &str = r#"Каждый объект в массиве должен представлять рекомендуемое аниме и иметь СЛЕДУЮЩИЕ КЛЮЧИ СТРОГО на английском языке: "title", "genre", "synopsis", ОБЯЗАТЕЛЬНОЕ поле "dataAiHint", и НЕОБЯЗАТЕЛЬНЫЕ поля "coverImage", "episodes", "status", "ageRating", "detailsLink", "kitsuApprovalRating".
Значения для ключей "title", "synopsis", "genre", "episodes", "status", "ageRating", "kitsuApprovalRating" должны быть на русском языке.
Значение для "genre", если жанров несколько, перечислите их через запятую (например, 'Экшен, Комедия').
Значение для "dataAiHint" ДОЛЖНО БЫТЬ строкой из одного или двух ключевых слов на английском языке, описывающих изображение или тематику аниме (например, "action anime", "fantasy world", "school life"). Это поле должно быть заполнено всегда, даже если "coverImage" отсутствует.
Значение для "coverImage" (если предоставляется) ДОЛЖНО БЫТЬ ПОЛНЫМ URL-адресом изображения (начинающимся с http:// или https://) ИСКЛЮЧИТЕЛЬНО с сайта {{IMAGE_HOST}}. Если не можете найти надежный URL с {{IMAGE_HOST}}, ПРОПУСТИТЕ это поле. НЕ ИСПОЛЬЗУЙТЕ другие домены.
Значение для "detailsLink" (если предоставляется) должно быть ПОЛНЫМ URL-адресом на страницу аниме на авторитетном сайте типа Kitsu, AniList или MyAnimeList.
Значение для "kitsuApprovalRating" (если предоставляется) должно быть строкой, представляющей процент одобрения на Kitsu (например, '78%'). Если недоступно, ПРОПУСТИТЕ это поле.
Постарайтесь предоставить как можно больше дополнительной информации (episodes, status, ageRating, detailsLink, kitsuApprovalRating)."#;

const QUIZ_SYSTEM_INTRO: &str = r#"Вы — экспертная система рекомендаций аниме. Вы принимаете ответы пользователя на опрос и его предпочтения и возвращаете персонализированные рекомендации аниме.
Ваш ответ ДОЛЖЕН быть JSON объектом. Этот объект должен содержать одно поле с ключом "recommendations".
Значением поля "recommendations" должен быть массив объектов."#;

const QUIZ_SYSTEM_OUTRO: &str = r#"Обязательно предоставьте от 3 до 5 рекомендаций, если это возможно на основе предпочтений. Если подходящих рекомендаций нет, верните пустой массив для "recommendations"."#;

const RANDOM_SYSTEM_INTRO: &str = r#"Ты — генератор случайных рекомендаций аниме. Твоя задача — предложить 3-5 совершенно случайных, но существующих аниме.
Твой ответ ДОЛЖЕН быть JSON объектом. Этот объект должен содержать одно поле с ключом "recommendations".
Значением поля "recommendations" должен быть массив из 3-5 объектов."#;

const RANDOM_SYSTEM_OUTRO: &str = "Предложи разнообразные и интересные варианты.";

const EXAMPLE_FULL: &str = r#"Пример объекта для одного аниме (с coverImage с {{IMAGE_HOST}} и полной доп. информацией):
{
  "title": "Название аниме на русском",
  "genre": "Экшен, Фэнтези",
  "synopsis": "Описание сюжета на русском.",
  "coverImage": "https://{{IMAGE_HOST}}/anime/poster_images/1415/medium.jpg",
  "dataAiHint": "adventure fantasy",
  "episodes": "25",
  "status": "Завершён",
  "ageRating": "R - 17+",
  "detailsLink": "https://kitsu.io/anime/code-geass-lelouch-of-the-rebellion",
  "kitsuApprovalRating": "92%"
}"#;

const EXAMPLE_NO_COVER: &str = r#"Пример объекта для одного аниме (БЕЗ coverImage и БЕЗ kitsuApprovalRating, но с обязательным dataAiHint и другой доп. информацией):
{
  "title": "Другое аниме",
  "genre": "Повседневность, Романтика",
  "synopsis": "Другое описание сюжета.",
  "dataAiHint": "slice of life romance",
  "episodes": "12",
  "status": "Выходит",
  "ageRating": "PG-13",
  "detailsLink": "https://anilist.co/anime/12345"
}"#;

const EXAMPLE_MINIMAL: &str = r#"Пример объекта для аниме БЕЗ coverImage, БЕЗ detailsLink и БЕЗ kitsuApprovalRating:
{
  "title": "Еще одно аниме",
  "genre": "Драма",
  "synopsis": "Очень драматичное описание.",
  "dataAiHint": "drama emotional",
  "episodes": "Фильм",
  "status": "Завершён",
  "ageRating": "PG-13"
}"#;

fn with_image_host(text: &str) -> String {
    text.replace("{{IMAGE_HOST}}", APPROVED_IMAGE_HOST)
}

fn system_prompt(intro: &str, outro: &str) -> String {
    with_image_host(&format!("{}\n{}\n{}", intro, FIELD_RULES, outro))
}

pub fn build_quiz_prompts(quiz_answers: &[String], preferences: &str) -> PromptPair {
    let user = format!(
        "Ответы на опрос: {}\nПредпочтения пользователя: {}\n\n{}\n{}\n{}\n\nПожалуйста, сгенерируй ответ в формате JSON.",
        quiz_answers.join("; "),
        preferences,
        EXAMPLE_FULL,
        EXAMPLE_NO_COVER,
        EXAMPLE_MINIMAL,
    );

    PromptPair {
        system: system_prompt(QUIZ_SYSTEM_INTRO, QUIZ_SYSTEM_OUTRO),
        user: with_image_host(&user),
    }
}

pub fn build_random_prompts() -> PromptPair {
    let user = format!(
        "Пожалуйста, сгенерируй 3-5 случайных рекомендаций аниме в формате JSON.\n\n{}\n{}",
        EXAMPLE_FULL, EXAMPLE_NO_COVER,
    );

    PromptPair {
        system: system_prompt(RANDOM_SYSTEM_INTRO, RANDOM_SYSTEM_OUTRO),
        user: with_image_host(&user),
    }
}
