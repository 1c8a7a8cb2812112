//! Email bodies for the contact flow.
//!
//! Every template renders an HTML part through maud, which escapes all
//! interpolated visitor input, and a plain-text part for clients that
//! do not render HTML.

use chrono::{DateTime, Utc};
use maud::{html, Markup, DOCTYPE};

use crate::contact::ContactMessage;

const BRAND: &str = "Essence Burn";

pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

fn layout(preview: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
            }
            body style="background-color:#f7eeed;font-family:sans-serif;color:#6b5b5e;padding:40px 0;" {
                div style="display:none;max-height:0;overflow:hidden;" { (preview) }
                div style="background-color:#ffffff;border-radius:12px;max-width:600px;margin:0 auto;padding:36px;" {
                    (body)
                }
            }
        }
    }
}

/// Message delivered to the shop's mailbox for every contact submission.
pub fn operator_notification(
    message: &ContactMessage,
    site_host: &str,
    submitted_at: DateTime<Utc>,
) -> RenderedEmail {
    let submitted = submitted_at.format("%d/%m/%Y %H:%M UTC").to_string();

    let body = html! {
        h1 style="color:#b68187;text-align:center;font-weight:500;font-size:24px;" {
            "📩 Nuevo mensaje de contacto"
        }
        p style="line-height:1.6;font-size:15px;" {
            "Un nuevo mensaje ha sido recibido a través del formulario de contacto en "
            strong { (site_host) } "."
        }
        div style="background-color:#f7eeed;padding:16px 20px;border-radius:10px;" {
            p { strong { "Nombre: " } (message.name) }
            p { strong { "Email: " } (message.email) }
            @if let Some(phone) = &message.phone {
                p { strong { "Teléfono: " } (phone) }
            }
            p { strong { "Asunto: " } (message.subject) }
            p { strong { "Fecha: " } (submitted) }
        }
        div style="border:1px solid #e0bdb8;border-radius:10px;padding:20px;margin-top:24px;" {
            h3 style="color:#b68187;font-weight:500;" { "Mensaje:" }
            p style="white-space:pre-line;line-height:1.6;" { (message.message) }
        }
        @if message.subscribe {
            div style="margin:20px 0;background-color:#fdf4f3;border-left:4px solid #e3b2a1;padding:10px 14px;" {
                p style="color:#b68187;font-style:italic;" {
                    "✅ El usuario solicitó suscribirse al " strong { "newsletter" } "."
                }
            }
        }
        p style="color:#999;font-size:12px;text-align:center;border-top:1px solid #eee;padding-top:10px;" {
            "Este mensaje fue enviado automáticamente desde el formulario de contacto de "
            strong { (site_host) } "."
        }
    };

    let mut text = format!(
        "Nuevo mensaje de contacto\n\nNombre: {}\nEmail: {}\n",
        message.name, message.email
    );
    if let Some(phone) = &message.phone {
        text.push_str(&format!("Teléfono: {}\n", phone));
    }
    text.push_str(&format!(
        "Asunto: {}\nFecha: {}\n\nMensaje:\n{}\n",
        message.subject, submitted, message.message
    ));
    if message.subscribe {
        text.push_str("\nEl usuario solicitó suscribirse al newsletter.\n");
    }

    RenderedEmail {
        subject: format!("Nuevo mensaje de contacto: {}", message.subject),
        html: layout("Nuevo mensaje desde el formulario de contacto 🌿", body).into_string(),
        text,
    }
}

/// Acknowledgement sent back to the visitor.
pub fn visitor_confirmation(message: &ContactMessage, site_url: &str) -> RenderedEmail {
    let first_name = message.first_name();
    let site_url = site_url.trim_end_matches('/');
    let rituals_url = format!("{}/rituales", site_url);
    let blog_url = format!("{}/blog", site_url);

    let button = "color:white;padding:14px 32px;border-radius:50px;text-decoration:none;font-weight:500;";

    let body = html! {
        h1 style="color:#b68187;text-align:center;font-weight:400;font-size:28px;" {
            "Gracias por escribirnos 💜"
        }
        p { "Hola " (first_name) "," }
        p {
            "Tu mensaje ha llegado a nuestro espacio y ya forma parte de la energía que compartimos en "
            strong { (BRAND) } ". Leemos cada palabra con atención y cariño."
        }
        p {
            "✨ " strong { "¿Qué sigue?" } br;
            "En breve, nuestro equipo se pondrá en contacto con vos para responder tu consulta."
        }
        p { "Mientras tanto, te invitamos a seguir explorando nuestros rituales o leer el blog:" }
        p style="text-align:center;" {
            a href=(rituals_url) style={ (button) "background-color:#e3b2a1;" } { "DESCUBRÍ TU RITUAL" }
        }
        p style="text-align:center;" {
            a href=(blog_url) style={ (button) "background-color:#b68187;" } { "LEÉ NUESTRO BLOG" }
        }
        p { "Gracias por ser parte de este viaje." br; "Tu esencia importa. Tu voz también." }
        p style="text-align:center;color:#a27d79;" {
            "Con amor," br; strong { "El equipo " (BRAND) }
        }
    };

    let text = format!(
        "Hola {},\n\nTu mensaje ha llegado a {}. En breve, nuestro equipo se pondrá en contacto con vos.\n\n\
         Descubrí tu ritual: {}\nLeé nuestro blog: {}\n\nCon amor,\nEl equipo {}\n",
        first_name, BRAND, rituals_url, blog_url, BRAND
    );

    RenderedEmail {
        subject: "Hemos recibido tu mensaje 💜".to_string(),
        html: layout("Gracias por contactarnos 🌸", body).into_string(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(phone: Option<&str>, subscribe: bool) -> ContactMessage {
        ContactMessage {
            name: "Ana <b>Pérez</b>".to_string(),
            email: "ana@example.com".to_string(),
            phone: phone.map(str::to_string),
            subject: "Velas".to_string(),
            message: "¿Tienen envíos?\nGracias".to_string(),
            subscribe,
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_notification_subject_and_fields() {
        let rendered = operator_notification(&message(Some("8888-1234"), true), "essenceburn.com", at());

        assert_eq!(rendered.subject, "Nuevo mensaje de contacto: Velas");
        assert!(rendered.html.contains("ana@example.com"));
        assert!(rendered.html.contains("8888-1234"));
        assert!(rendered.html.contains("newsletter"));
        assert!(rendered.html.contains("09/03/2024 14:05 UTC"));
        assert!(rendered.text.contains("Teléfono: 8888-1234"));
    }

    #[test]
    fn test_notification_omits_optional_sections() {
        let rendered = operator_notification(&message(None, false), "essenceburn.com", at());

        assert!(!rendered.html.contains("Teléfono"));
        assert!(!rendered.html.contains("newsletter"));
        assert!(!rendered.text.contains("Teléfono"));
    }

    #[test]
    fn test_visitor_input_is_escaped() {
        let rendered = operator_notification(&message(None, false), "essenceburn.com", at());

        assert!(!rendered.html.contains("<b>Pérez</b>"));
        assert!(rendered.html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_confirmation_greets_visitor_and_links_site() {
        let rendered = visitor_confirmation(&message(None, false), "https://essenceburn.com/");

        assert_eq!(rendered.subject, "Hemos recibido tu mensaje 💜");
        assert!(rendered.html.contains("Hola Ana,"));
        assert!(rendered.html.contains("https://essenceburn.com/rituales"));
        assert!(rendered.html.contains("https://essenceburn.com/blog"));
        assert!(rendered.text.starts_with("Hola Ana,"));
    }
}
