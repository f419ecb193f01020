use serde::{Deserialize, Serialize};

use super::error::NotificationError;
use crate::config::NotificationConfig;
use crate::domain::VolunteerApplication;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Name and a plausible email are required; everything else is optional.
pub fn validate_application(application: &VolunteerApplication) -> Result<(), NotificationError> {
    if application.name.trim().is_empty() {
        return Err(NotificationError::InvalidApplication("name is required".to_string()));
    }
    let email = application.email.trim();
    let plausible = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !plausible {
        return Err(NotificationError::InvalidApplication(format!("invalid email: {email:?}")));
    }
    Ok(())
}

pub fn format_volunteer_email(application: &VolunteerApplication, config: &NotificationConfig) -> OutgoingEmail {
    let interest_areas = if application.interest_areas.is_empty() {
        "Não informadas".to_string()
    } else {
        application.interest_areas.join(", ")
    };
    let experience = application
        .prior_experience
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or("Não informada");

    let body = format!(
        "Nova candidatura de voluntário\n\n\
         Nome: {name}\n\
         Email: {email}\n\
         Telefone: {phone}\n\
         Áreas de interesse: {interest_areas}\n\
         Disponibilidade: {availability}\n\
         Experiência prévia: {experience}\n",
        name = application.name.trim(),
        email = application.email.trim(),
        phone = application.phone.trim(),
        availability = application.availability.trim(),
    );

    OutgoingEmail {
        from: config.sender.clone(),
        to: config.recipient.clone(),
        subject: format!("{} {}", config.subject_prefix, application.name.trim()),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> VolunteerApplication {
        VolunteerApplication {
            name: "Joana Lima".into(),
            email: "joana@gmail.com".into(),
            phone: "(11) 99999-0000".into(),
            interest_areas: vec!["Triagem".into(), "Logística".into()],
            availability: "Fins de semana".into(),
            prior_experience: None,
        }
    }

    #[test]
    fn email_goes_to_the_configured_address() {
        let config = NotificationConfig::default();
        let email = format_volunteer_email(&application(), &config);

        assert_eq!(email.to, config.recipient);
        assert_eq!(email.from, config.sender);
        assert!(email.subject.ends_with("Joana Lima"));
        assert!(email.body.contains("Áreas de interesse: Triagem, Logística"));
        assert!(email.body.contains("Experiência prévia: Não informada"));
    }

    #[test]
    fn blank_name_or_bad_email_is_rejected() {
        let mut missing_name = application();
        missing_name.name = "  ".into();
        assert!(matches!(
            validate_application(&missing_name),
            Err(NotificationError::InvalidApplication(_))
        ));

        let mut bad_email = application();
        bad_email.email = "joana".into();
        let err = validate_application(&bad_email).unwrap_err();
        assert_eq!(err.http_status(), 400);

        assert!(validate_application(&application()).is_ok());
    }
}
