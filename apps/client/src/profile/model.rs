//! Profile Model: the draft behind the profile screen.
//!
//! Load and save are the model's mutating server operations and never overlap:
//! while one is in flight, the other is rejected with `ProfileError::Busy`.
//!
//! Save is two-phase (resume upload, then profile payload). If the upload
//! succeeds and the payload is rejected, the server already holds the new
//! file while the draft still shows it as pending. The two agree again after
//! the next successful save or load.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::fields::{ListField, PendingResume, Profile, ScalarField};
use super::tags::TagList;
use crate::api::ApiClient;
use crate::errors::ProfileError;
use crate::notify::Notifier;

const SAVING_MESSAGE: &str = "Saving your profile...";
const SAVED_MESSAGE: &str = "Profile saved successfully!";

pub struct ProfileModel {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    draft: Mutex<Profile>,
    in_flight: AtomicBool,
    epoch: AtomicU64,
}

/// Releases the in-flight slot on drop, including on early return.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ProfileError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| ProfileError::Busy)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ProfileModel {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            draft: Mutex::new(Profile::default()),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    /// Whether a load or save is running; the save action is disabled meanwhile.
    #[allow(dead_code)]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Marks the screen as left. Loads still outstanding will not touch the draft.
    #[allow(dead_code)]
    pub fn deactivate(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    pub fn draft(&self) -> Profile {
        self.draft.lock().clone()
    }

    /// Fetches the profile and replaces the draft with its normalized form.
    /// On failure the previous draft is kept and one notification is shown.
    pub async fn load(&self) -> Result<Profile, ProfileError> {
        let _slot = InFlight::acquire(&self.in_flight)?;
        let epoch = self.epoch.load(Ordering::Acquire);

        let wire = match self.api.fetch_profile().await {
            Ok(wire) => wire,
            Err(e) => {
                let err = ProfileError::Fetch(e);
                warn!("Profile load failed: {err}");
                self.notifier.error(&err.user_message());
                return Err(err);
            }
        };

        let profile = Profile::from_wire(wire);
        if self.epoch.load(Ordering::Acquire) == epoch {
            *self.draft.lock() = profile.clone();
            debug!("Profile draft loaded");
        } else {
            debug!("Discarding profile response for an inactive screen");
        }
        Ok(profile)
    }

    pub fn update_field(&self, field: ScalarField, value: impl Into<String>) {
        *self.draft.lock().scalar_mut(field) = value.into();
    }

    pub fn update_list_field(&self, field: ListField, tokens: TagList) {
        *self.draft.lock().list_mut(field) = tokens;
    }

    /// Validates raw tokens before replacing a list field.
    #[allow(dead_code)]
    pub fn set_list_tokens<I, S>(&self, field: ListField, tokens: I) -> Result<(), ProfileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = TagList::try_from_tokens(tokens)?;
        self.update_list_field(field, list);
        Ok(())
    }

    pub fn list(&self, field: ListField) -> TagList {
        self.draft.lock().list(field).clone()
    }

    pub fn select_resume(&self, resume: PendingResume) {
        info!("Resume selected: {}", resume.filename());
        self.draft.lock().resume.pending = Some(resume);
    }

    /// Uploads a pending resume (if any), then submits the whole profile.
    /// Shows one pending notification and exactly one terminal notification.
    pub async fn save(&self) -> Result<(), ProfileError> {
        let _slot = InFlight::acquire(&self.in_flight)?;
        let toast = self.notifier.pending(SAVING_MESSAGE);

        match self.run_save().await {
            Ok(()) => {
                self.notifier.success(toast, SAVED_MESSAGE);
                Ok(())
            }
            Err(err) => {
                warn!("Profile save failed: {err}");
                self.notifier.failure(toast, &err.user_message());
                Err(err)
            }
        }
    }

    async fn run_save(&self) -> Result<(), ProfileError> {
        let snapshot = self.draft();
        snapshot.validate().map_err(ProfileError::ProfileSave)?;

        let mut payload = snapshot.to_wire();

        let uploaded = match &snapshot.resume.pending {
            Some(resume) => {
                self.api
                    .upload_resume(resume.filename(), resume.bytes())
                    .await
                    .map_err(ProfileError::ResumeUpload)?;
                info!("Resume uploaded: {}", resume.filename());
                payload.resume_filename = Some(resume.filename().to_string());
                Some(resume.clone())
            }
            None => None,
        };

        self.api
            .save_profile(&payload)
            .await
            .map_err(ProfileError::ProfileSave)?;

        if let Some(uploaded) = uploaded {
            let mut draft = self.draft.lock();
            draft.resume.stored = Some(uploaded.filename().to_string());
            // A different file picked while saving stays pending.
            if draft.resume.pending.as_ref() == Some(&uploaded) {
                draft.resume.pending = None;
            }
        }
        Ok(())
    }
}
