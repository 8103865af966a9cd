/// Labels and texts that differ between invoices and offers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentKind {
    pub title: &'static str,
    pub number_label: &'static str,
    pub number_placeholder: &'static str,
    pub total_label: &'static str,
    pub file_name: &'static str,
    /// Letter-style greeting plus this sentence above the table.
    pub intro: Option<&'static str>,
    /// Printed below the totals, one line each.
    pub notices: &'static [&'static str],
    pub logo_width_mm: f32,
    /// Print the last group's subtotal even when the list has no category.
    pub final_subtotal: bool,
}

impl DocumentKind {
    pub const INVOICE: DocumentKind = DocumentKind {
        title: "Rechnung",
        number_label: "Rechnungsnummer",
        number_placeholder: "[Rechnungsnummer]",
        total_label: "Gesamtbetrag",
        file_name: "rechnung.pdf",
        intro: None,
        notices: &[
            "Der Gesamtbetrag ist ab Erhalt der Rechnung zahlbar innerhalb von 7 Tagen ohne Abzug.",
            "Es wird gemäß §19 Abs. 1 Umsatzsteuergesetz keine Umsatzsteuer erhoben.",
        ],
        logo_width_mm: 50.0,
        final_subtotal: false,
    };

    pub const OFFER: DocumentKind = DocumentKind {
        title: "Angebot",
        number_label: "Angebotsnummer",
        number_placeholder: "[Angebotsnummer]",
        total_label: "Angebotsbetrag",
        file_name: "angebot.pdf",
        intro: Some(
            "vielen Dank für Ihre Anfrage. Wir unterbreiten Ihnen hiermit folgendes Angebot:",
        ),
        notices: &["Das Angebot ist bis zu 14 Tage gültig."],
        logo_width_mm: 100.0,
        final_subtotal: true,
    };

    /// Looks up a kind by its URL/CLI slug.
    pub fn from_slug(slug: &str) -> Option<DocumentKind> {
        match slug {
            "invoice" | "rechnung" => Some(Self::INVOICE),
            "offer" | "angebot" => Some(Self::OFFER),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs() {
        assert_eq!(DocumentKind::from_slug("invoice"), Some(DocumentKind::INVOICE));
        assert_eq!(DocumentKind::from_slug("angebot"), Some(DocumentKind::OFFER));
        assert_eq!(DocumentKind::from_slug("quote"), None);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(DocumentKind::INVOICE.file_name, "rechnung.pdf");
        assert_eq!(DocumentKind::OFFER.file_name, "angebot.pdf");
    }

    #[test]
    fn test_offers_always_close_with_subtotal() {
        assert!(DocumentKind::OFFER.final_subtotal);
        assert!(!DocumentKind::INVOICE.final_subtotal);
    }
}
