//! The built-in marketing catalog: prompt bodies and the texts shown around them.

use super::catalog::{FieldSpec, TemplateDefinition};

/// Social media post.
pub static POST: &str = r#"Jesteś ekspertem od marketingu w social media. Stwórz angażujący post na podstawie podanego tematu.

Post powinien:
- Być krótki i chwytliwy (max 280 znaków dla Twitter, max 2200 dla innych platform)
- Zawierać emocjonalny hook
- Mieć jasne CTA (call to action)
- Używać odpowiednich emoji
- Być zoptymalizowany pod engagement

Temat: {topic}
Platforma: {platform}
Ton: {tone}"#;

/// Caption for a photo or a video.
pub static CAPTION: &str = r#"Stwórz idealny opis do zdjęcia/filmu na Instagram/TikTok.

Opis powinien:
- Być kreatywny i przyciągający uwagę
- Zawierać 5-10 relevantnych hashtagów
- Mieć storytelling element
- Zachęcać do interakcji
- Pasować do contentu wizualnego

Temat/Opis contentu: {topic}
Platforma: {platform}"#;

/// Twitter/X thread.
pub static THREAD: &str = r#"Stwórz angażujący thread na Twitter/X (seria połączonych postów).

Thread powinien:
- Składać się z 5-8 tweetów
- Każdy tweet max 280 znaków
- Pierwszy tweet = hook (przyciąga uwagę)
- Środkowe tweety = wartość/edukacja
- Ostatni tweet = CTA + zachęta do RT
- Numeracja: 1/8, 2/8, etc.

Temat: {topic}"#;

/// Advertisement copy.
pub static AD: &str = r#"Stwórz przekonującą reklamę/ad copy.

Reklama powinna:
- Mieć silny headline (nagłówek)
- Pokazywać korzyści (nie tylko features)
- Adresować pain points
- Mieć jasne CTA
- Być zgodna z AIDA (Attention, Interest, Desire, Action)

Produkt/Usługa: {topic}
Target audience: {audience}
Platforma: {platform}"#;

/// Marketing email.
pub static EMAIL: &str = r#"Napisz profesjonalny email marketingowy.

Email powinien:
- Mieć chwytliwy subject line
- Personalizowany greeting
- Jasną wartość dla odbiorcy
- Storytelling lub case study
- Silne CTA
- PS z dodatkową zachętą

Temat/Oferta: {topic}
Cel: {goal}"#;

/// Short marketing video script.
pub static SCRIPT: &str = r#"Napisz skrypt do krótkiego filmu marketingowego (15-60 sekund).

Skrypt powinien zawierać:
- Hook (pierwsze 3 sekundy)
- Problem/Pain point
- Rozwiązanie (produkt/usługa)
- Korzyści
- CTA
- Wskazówki wizualne

Temat: {topic}
Długość: {duration} sekund
Platforma: {platform}"#;

/// Prompt for an external AI image generator. No image is generated here.
pub static IMAGE_PROMPT: &str = r#"Stwórz szczegółowy prompt do generowania obrazu AI dla: {description}

Uwzględnij:
- Styl wizualny i estetykę
- Kolory i nastrój
- Kompozycję i perspektywę
- Szczegóły techniczne (rozdzielczość, format)
- Słowa kluczowe dla AI image generator

Prompt powinien być w języku angielskim, szczegółowy i zoptymalizowany pod generatory obrazów AI."#;

static IMAGE_FOOTER: &str = "\n\nℹ️ **Jak użyć:**
1. Skopiuj powyższy prompt
2. Wklej do generatora AI (DALL-E, Midjourney, Stable Diffusion)
3. Dostosuj parametry według potrzeb

💡 **Polecane narzędzia:**
• DALL-E 3 (OpenAI)
• Midjourney
• Stable Diffusion
• Google Imagen 3";

/// Free text that is not a known command. Uses the `{message}` placeholder.
pub static CONVERSATION: &str = r#"Jesteś asystentem marketingowym. Użytkownik napisał: "{message}"

Przeanalizuj intencję i odpowiedz pomocnie. Jeśli użytkownik chce:
- Stworzyć post/content → wygeneruj go
- Zadać pytanie o marketing → odpowiedz merytorycznie
- Poprosić o pomoc → zasugeruj odpowiednie komendy

Odpowiedz naturalnie i pomocnie po polsku."#;

pub static CONVERSATION_FAILURE: &str =
    "❌ Przepraszam, wystąpił błąd. Spróbuj użyć konkretnej komendy jak /post lub /help";

fn required(name: &str) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        default: None,
    }
}

fn optional(name: &str, default: &str) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        default: Some(default.to_string()),
    }
}

/// The templates served when no catalog file is configured
pub fn templates() -> Vec<TemplateDefinition> {
    vec![
        TemplateDefinition {
            id: "post".into(),
            command: "post".into(),
            description: "/post <temat> - Generuj post\nPrzykład: /post Nowy produkt eco-friendly".into(),
            body: POST.into(),
            fields: vec![
                required("topic"),
                optional("platform", "Instagram"),
                optional("tone", "profesjonalny"),
            ],
            usage: "❌ Podaj temat posta!\nPrzykład: /post Nowy produkt eco-friendly".into(),
            progress: "✍️ Tworzę post... Chwilę!".into(),
            header: "📱 Post ({platform}):\n\n".into(),
            footer: None,
            failure: "❌ Wystąpił błąd podczas generowania posta. Spróbuj ponownie!".into(),
        },
        TemplateDefinition {
            id: "caption".into(),
            command: "caption".into(),
            description: "/caption <opis> - Opis do zdjęcia/filmu\nPrzykład: /caption Zachód słońca nad morzem".into(),
            body: CAPTION.into(),
            fields: vec![required("topic"), optional("platform", "Instagram")],
            usage: "❌ Opisz content!\nPrzykład: /caption Zachód słońca nad morzem".into(),
            progress: "✍️ Tworzę caption... Chwilę!".into(),
            header: "📸 Caption ({platform}):\n\n".into(),
            footer: None,
            failure: "❌ Wystąpił błąd podczas generowania caption. Spróbuj ponownie!".into(),
        },
        TemplateDefinition {
            id: "thread".into(),
            command: "thread".into(),
            description: "/thread <temat> - Thread (seria postów)\nPrzykład: /thread 10 tips na produktywność".into(),
            body: THREAD.into(),
            fields: vec![required("topic")],
            usage: "❌ Podaj temat threada!\nPrzykład: /thread 10 tips na produktywność".into(),
            progress: "✍️ Tworzę thread... To może chwilę potrwać!".into(),
            header: "🧵 Thread:\n\n".into(),
            footer: None,
            failure: "❌ Wystąpił błąd podczas generowania threada. Spróbuj ponownie!".into(),
        },
        TemplateDefinition {
            id: "ad".into(),
            command: "ad".into(),
            description: "/ad <produkt> - Reklama\nPrzykład: /ad Kurs online marketingu".into(),
            body: AD.into(),
            fields: vec![
                required("topic"),
                optional("audience", "ogólna"),
                optional("platform", "Facebook"),
            ],
            usage: "❌ Opisz produkt/usługę!\nPrzykład: /ad Kurs online marketingu".into(),
            progress: "✍️ Tworzę reklamę... Chwilę!".into(),
            header: "📢 Reklama ({platform}):\n\n".into(),
            footer: None,
            failure: "❌ Wystąpił błąd podczas generowania reklamy. Spróbuj ponownie!".into(),
        },
        TemplateDefinition {
            id: "email".into(),
            command: "email".into(),
            description: "/email <temat> - Email marketingowy\nPrzykład: /email Promocja Black Friday".into(),
            body: EMAIL.into(),
            fields: vec![required("topic"), optional("goal", "sprzedaż")],
            usage: "❌ Podaj temat emaila!\nPrzykład: /email Promocja Black Friday".into(),
            progress: "✍️ Piszę email... Chwilę!".into(),
            header: "📧 Email marketingowy:\n\n".into(),
            footer: None,
            failure: "❌ Wystąpił błąd podczas generowania emaila. Spróbuj ponownie!".into(),
        },
        TemplateDefinition {
            id: "script".into(),
            command: "script".into(),
            description: "/script <temat> - Skrypt do filmu\nPrzykład: /script Prezentacja nowego produktu".into(),
            body: SCRIPT.into(),
            fields: vec![
                required("topic"),
                optional("duration", "30"),
                optional("platform", "TikTok"),
            ],
            usage: "❌ Podaj temat filmu!\nPrzykład: /script Prezentacja nowego produktu".into(),
            progress: "✍️ Tworzę skrypt... Chwilę!".into(),
            header: "🎬 Skrypt ({duration}s, {platform}):\n\n".into(),
            footer: None,
            failure: "❌ Wystąpił błąd podczas generowania skryptu. Spróbuj ponownie!".into(),
        },
        TemplateDefinition {
            id: "image-prompt".into(),
            command: "image".into(),
            description: "/image <opis> - Prompt do generowania obrazu AI\nPrzykład: /image Nowoczesne logo firmy tech".into(),
            body: IMAGE_PROMPT.into(),
            fields: vec![required("description")],
            usage: "❌ Podaj opis obrazu!\nPrzykład: /image Nowoczesny design logo dla firmy tech".into(),
            progress: "🎨 Generuję obraz: {description}...".into(),
            header: "🎨 **Prompt do generowania obrazu:**\n\n".into(),
            footer: Some(IMAGE_FOOTER.into()),
            failure: "❌ Wystąpił błąd podczas generowania promptu. Spróbuj ponownie!".into(),
        },
    ]
}
