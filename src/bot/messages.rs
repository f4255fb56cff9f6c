//! Fixed texts the bot answers without asking the model.

pub static WELCOME: &str = r#"🤖 Witaj w Marketing Agent Bot!

Jestem AI-powered asystentem marketingowym napędzanym przez Gemini 3 Pro.

📝 Mogę pomóc Ci w:
✅ Tworzeniu treści marketingowych
✅ Generowaniu postów na social media
✅ Pisaniu opisów i captionów
✅ Tworzeniu threadów i reklam
✅ Pisaniu emaili marketingowych
✅ Tworzeniu skryptów do filmów

🎯 Dostępne komendy:
/post - Generuj post na social media
/caption - Stwórz opis do zdjęcia/filmu
/thread - Wygeneruj thread (seria postów)
/ad - Stwórz reklamę
/email - Napisz email marketingowy
/script - Stwórz skrypt do filmu
/help - Pokaż pomoc

💬 Możesz też po prostu napisać do mnie naturalnie, a ja zrozumiem Twoją intencję!

Gotowy do tworzenia? 🚀"#;

pub static HELP_HEADER: &str = "📚 Jak używać Marketing Agent Bot:\n\n🎯 KOMENDY SPECJALISTYCZNE:";

pub static HELP_FOOTER: &str = r#"💬 NATURALNA KONWERSACJA:
Możesz też po prostu napisać:
- "Stwórz post o kawie"
- "Potrzebuję opisu do zdjęcia"
- "Napisz reklamę mojego produktu"

🎨 OPCJE DODATKOWE:
Możesz dodać szczegóły jak:
- Platforma (Instagram, Twitter, LinkedIn, TikTok)
- Ton (profesjonalny, casualowy, humorystyczny)
- Długość (krótki, średni, długi)
- Target audience (młodzież, profesjonaliści, etc.)

Przykład: /post Nowy produkt | Instagram | casualowy

Gotowy? Zacznijmy! 🚀"#;
