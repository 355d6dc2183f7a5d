use crate::models::account::Account;
use crate::models::dashboard::{ModalKind, SharedState};
use crate::models::issue::Issue;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Call,
    Email,
    Sms,
    Meeting,
}

/// An out-of-process action handed to the OS: dialer, mail client, messages, browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContactIntent {
    Call { number: String },
    Email { to: String, subject: String, body: String },
    Sms { number: String, body: String },
    Meeting { link: String },
}

/// Fires an intent URI. Success or failure is never reported back.
pub trait IntentLauncher: Send + Sync {
    fn launch(&self, uri: &str);
}

fn dial_string(number: &str) -> String {
    number
        .chars()
        .enumerate()
        .filter(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '+'))
        .map(|(_, c)| c)
        .collect()
}

/// Query string with `%20` for spaces; mail clients do not all decode `+`.
fn encode_query(pairs: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish().replace('+', "%20")
}

impl ContactIntent {
    pub fn to_uri(&self) -> Result<String, String> {
        let raw = match self {
            ContactIntent::Call { number } => {
                let digits = dial_string(number);
                if digits.trim_start_matches('+').is_empty() {
                    return Err(format!("Not a dialable number: {number}"));
                }
                format!("tel:{digits}")
            }
            ContactIntent::Email { to, subject, body } => {
                if !to.contains('@') {
                    return Err(format!("Not an email address: {to}"));
                }
                format!(
                    "mailto:{}?{}",
                    to.trim(),
                    encode_query(&[("subject", subject), ("body", body)])
                )
            }
            ContactIntent::Sms { number, body } => {
                let digits = dial_string(number);
                if digits.trim_start_matches('+').is_empty() {
                    return Err(format!("Not a dialable number: {number}"));
                }
                format!("sms:{digits}?{}", encode_query(&[("body", body)]))
            }
            ContactIntent::Meeting { link } => {
                let url = Url::parse(link)
                    .map_err(|e| format!("Invalid meeting link {link}: {e}"))?;
                if url.scheme() != "https" && url.scheme() != "http" {
                    return Err(format!("Meeting link must be http(s): {link}"));
                }
                return Ok(url.to_string());
            }
        };

        Url::parse(&raw)
            .map(|url| url.to_string())
            .map_err(|e| format!("Failed to build intent URI: {e}"))
    }
}

pub fn contact_intent_for(
    account: &Account,
    kind: ContactKind,
    issue: Option<&Issue>,
    signature: &str,
) -> ContactIntent {
    let contact = &account.contact;
    let topic = issue
        .map(|i| format!("{} ({})", i.title, i.id))
        .unwrap_or_else(|| format!("{} account review", account.name));

    match kind {
        ContactKind::Call => ContactIntent::Call {
            number: contact.phone.clone(),
        },
        ContactKind::Email => ContactIntent::Email {
            to: contact.email.clone(),
            subject: format!("Re: {topic}"),
            body: format!("Hi {},\n\nFollowing up on {topic}.\n\n{signature}", contact.name),
        },
        ContactKind::Sms => ContactIntent::Sms {
            number: contact.phone.clone(),
            body: format!("Hi {}, following up on {topic}. {signature}", contact.name),
        },
        ContactKind::Meeting => ContactIntent::Meeting {
            link: contact.meeting_link.clone(),
        },
    }
}

#[cfg(feature = "desktop")]
pub struct OpenerLauncher {
    pub app: tauri::AppHandle,
}

#[cfg(feature = "desktop")]
impl IntentLauncher for OpenerLauncher {
    fn launch(&self, uri: &str) {
        use tauri_plugin_opener::OpenerExt;
        if let Err(e) = self.app.opener().open_url(uri, None::<&str>) {
            log::warn!("intent {uri} was not handed off: {e}");
        }
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn launch_contact(
    kind: ContactKind,
    issue_id: Option<String>,
    state: tauri::State<'_, SharedState>,
    app: tauri::AppHandle,
) -> Result<ContactIntent, String> {
    let launcher = OpenerLauncher { app };
    launch_contact_internal(state.inner(), &launcher, kind, issue_id.as_deref())
}

pub fn launch_contact_internal(
    state: &SharedState,
    launcher: &dyn IntentLauncher,
    kind: ContactKind,
    issue_id: Option<&str>,
) -> Result<ContactIntent, String> {
    let (intent, uri, account_id) = {
        let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
        let account = lock.selected_account()?;
        let issue = issue_id.map(|id| lock.issue(id)).transpose()?;
        let intent = contact_intent_for(account, kind, issue, &lock.contact_signature);
        let uri = intent.to_uri()?;
        let account_id = account.id.clone();
        lock.modals.close(ModalKind::Contact);
        (intent, uri, account_id)
    };

    // Hand off outside the state lock.
    log::info!("launching {kind:?} intent for {account_id}");
    launcher.launch(&uri);
    Ok(intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::seed::initial_state;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingLauncher {
        launched: Mutex<Vec<String>>,
    }

    impl IntentLauncher for RecordingLauncher {
        fn launch(&self, uri: &str) {
            self.launched.lock().unwrap().push(uri.to_string());
        }
    }

    #[test]
    fn call_uri_keeps_only_dialable_characters() {
        let intent = ContactIntent::Call {
            number: "+1 (312) 555-0143".to_string(),
        };
        assert_eq!(intent.to_uri().unwrap(), "tel:+13125550143");

        let bad = ContactIntent::Call {
            number: "ext".to_string(),
        };
        assert!(bad.to_uri().is_err());
    }

    #[test]
    fn email_uri_percent_encodes_spaces_and_newlines() {
        let intent = ContactIntent::Email {
            to: "dana@example.com".to_string(),
            subject: "Re: Claims & codes".to_string(),
            body: "Line one\nLine two".to_string(),
        };
        assert_eq!(
            intent.to_uri().unwrap(),
            "mailto:dana@example.com?subject=Re%3A%20Claims%20%26%20codes&body=Line%20one%0ALine%20two"
        );
    }

    #[test]
    fn sms_uri_carries_body() {
        let intent = ContactIntent::Sms {
            number: "617-555-0188".to_string(),
            body: "Call me back".to_string(),
        };
        assert_eq!(intent.to_uri().unwrap(), "sms:6175550188?body=Call%20me%20back");
    }

    #[test]
    fn meeting_link_must_be_web_url() {
        let ok = ContactIntent::Meeting {
            link: "https://meet.example.com/qbr".to_string(),
        };
        assert_eq!(ok.to_uri().unwrap(), "https://meet.example.com/qbr");

        let bad = ContactIntent::Meeting {
            link: "javascript:alert(1)".to_string(),
        };
        assert!(bad.to_uri().is_err());
    }

    #[test]
    fn launch_uses_selected_account_and_issue_context() {
        let state: SharedState = Arc::new(Mutex::new(initial_state(Utc::now()).unwrap()));
        state.lock().unwrap().modals.contact = true;
        let launcher = RecordingLauncher::default();

        let issue = Some("ISS-1001");
        let intent = launch_contact_internal(&state, &launcher, ContactKind::Email, issue).unwrap();
        match intent {
            ContactIntent::Email { subject, .. } => {
                assert_eq!(subject, "Re: Claims export rejected (ISS-1001)")
            }
            other => panic!("unexpected intent {other:?}"),
        }

        let launched = launcher.launched.lock().unwrap();
        assert_eq!(launched.len(), 1);
        assert!(launched[0].starts_with("mailto:dana.ortiz@lakeside-pp.example.com?subject="));
        assert!(!state.lock().unwrap().modals.contact);
    }

    struct LockCheckingLauncher {
        state: SharedState,
        lock_was_free: Mutex<Option<bool>>,
    }

    impl IntentLauncher for LockCheckingLauncher {
        fn launch(&self, _uri: &str) {
            let free = self.state.try_lock().is_ok();
            *self.lock_was_free.lock().unwrap() = Some(free);
        }
    }

    #[test]
    fn launcher_runs_without_the_state_lock() {
        let state: SharedState = Arc::new(Mutex::new(initial_state(Utc::now()).unwrap()));
        let launcher = LockCheckingLauncher {
            state: state.clone(),
            lock_was_free: Mutex::new(None),
        };

        launch_contact_internal(&state, &launcher, ContactKind::Call, None).unwrap();
        assert_eq!(*launcher.lock_was_free.lock().unwrap(), Some(true));
    }

    #[test]
    fn unknown_issue_launches_nothing() {
        let state: SharedState = Arc::new(Mutex::new(initial_state(Utc::now()).unwrap()));
        let launcher = RecordingLauncher::default();
        let result = launch_contact_internal(&state, &launcher, ContactKind::Call, Some("ISS-404"));
        assert!(result.is_err());
        assert!(launcher.launched.lock().unwrap().is_empty());
    }
}
