use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::FutureExt as _;
use fractic_server_error::ServerError;
use tracing::{debug, info};

use crate::{
    clock::{Clock, SystemClock},
    config::CoachlyticConfig,
    domain::logic::saga::Saga,
    entities::{
        Client, ClientDraft, ClientId, ClientPatch, NewClient, NoteDraft, NoteEntry, NoteId,
        NoteRecord, SessionContext,
    },
    errors::{
        ClientNotFound, ClientWriteFailed, EmptyNoteContent, InvalidClientName, InvalidProgress,
        NoteMigrationFailed, NoteRecordNotFound,
    },
    notes::NoteJournalCodec,
    repositories::ClientRepository,
};

#[async_trait]
pub trait ClientUsecase: Send + Sync {
    async fn list_clients(&self, ctx: &SessionContext) -> Result<Vec<Client>, ServerError>;

    async fn get_client(&self, ctx: &SessionContext, id: &ClientId)
        -> Result<Client, ServerError>;

    async fn create_client(
        &self,
        ctx: &SessionContext,
        new_client: NewClient,
    ) -> Result<Client, ServerError>;

    async fn update_client(
        &self,
        ctx: &SessionContext,
        id: &ClientId,
        patch: ClientPatch,
    ) -> Result<Client, ServerError>;

    async fn delete_client(&self, ctx: &SessionContext, id: &ClientId)
        -> Result<(), ServerError>;

    // Note journal kept in the client's notes column. Entries are addressed
    // by position in the decoded, newest-first list.

    async fn list_notes(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
    ) -> Result<Vec<NoteEntry>, ServerError>;

    async fn add_note(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        content: &str,
    ) -> Result<Vec<NoteEntry>, ServerError>;

    async fn edit_note(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        index: usize,
        content: &str,
    ) -> Result<Vec<NoteEntry>, ServerError>;

    async fn delete_note(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        index: usize,
    ) -> Result<Vec<NoteEntry>, ServerError>;

    // Note records stored as their own rows, addressed by id.

    async fn list_journal(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
    ) -> Result<Vec<NoteRecord>, ServerError>;

    async fn add_journal_entry(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        content: &str,
    ) -> Result<NoteRecord, ServerError>;

    async fn edit_journal_entry(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        note_id: &NoteId,
        content: &str,
    ) -> Result<NoteRecord, ServerError>;

    async fn delete_journal_entry(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        note_id: &NoteId,
    ) -> Result<(), ServerError>;

    /// Moves the entries of the notes column into note records and clears
    /// the column. Returns the created records, newest first.
    async fn migrate_legacy_notes(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
    ) -> Result<Vec<NoteRecord>, ServerError>;
}

pub struct ClientUsecaseImpl<R, C = SystemClock>
where
    R: ClientRepository,
    C: Clock,
{
    repository: R,
    clock: C,
    codec: NoteJournalCodec,
}

impl<R: ClientRepository> ClientUsecaseImpl<R> {
    pub fn new(repository: R, config: CoachlyticConfig) -> Self {
        Self::with_clock(repository, config, SystemClock)
    }
}

impl<R: ClientRepository, C: Clock> ClientUsecaseImpl<R, C> {
    pub fn with_clock(repository: R, config: CoachlyticConfig, clock: C) -> Self {
        Self {
            repository,
            clock,
            codec: NoteJournalCodec::new(config.note_stamp_format),
        }
    }

    async fn find_owned(
        &self,
        ctx: &SessionContext,
        id: &ClientId,
    ) -> Result<Client, ServerError> {
        self.repository
            .find_client(&ctx.user_id, id)
            .await?
            .ok_or_else(|| ClientNotFound::new(id.as_str()))
    }

    async fn find_owned_record(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        note_id: &NoteId,
    ) -> Result<NoteRecord, ServerError> {
        self.find_owned(ctx, client_id).await?;
        self.repository
            .list_note_records(client_id)
            .await?
            .into_iter()
            .find(|r| &r.id == note_id)
            .ok_or_else(|| NoteRecordNotFound::new(note_id.as_str(), client_id.as_str()))
    }

    async fn write_notes(&self, client_id: &ClientId, blob: &str) -> Result<(), ServerError> {
        self.repository
            .update_client_notes(client_id, blob)
            .await
            .map_err(|e| ClientWriteFailed::with_debug("update notes of", client_id.as_str(), &e))
    }
}

fn validate_name(name: &str) -> Result<(), ServerError> {
    if name.trim().is_empty() {
        return Err(InvalidClientName::new());
    }
    Ok(())
}

fn validate_progress(progress: u8) -> Result<(), ServerError> {
    if progress > 100 {
        return Err(InvalidProgress::new(progress));
    }
    Ok(())
}

fn validate_note(content: &str) -> Result<(), ServerError> {
    if content.trim().is_empty() {
        return Err(EmptyNoteContent::new());
    }
    Ok(())
}

#[async_trait]
impl<R, C> ClientUsecase for ClientUsecaseImpl<R, C>
where
    R: ClientRepository,
    C: Clock,
{
    async fn list_clients(&self, ctx: &SessionContext) -> Result<Vec<Client>, ServerError> {
        self.repository.list_clients(&ctx.user_id).await
    }

    async fn get_client(
        &self,
        ctx: &SessionContext,
        id: &ClientId,
    ) -> Result<Client, ServerError> {
        self.find_owned(ctx, id).await
    }

    async fn create_client(
        &self,
        ctx: &SessionContext,
        new_client: NewClient,
    ) -> Result<Client, ServerError> {
        validate_name(&new_client.name)?;
        validate_progress(new_client.progress)?;
        let NewClient {
            name,
            email,
            phone,
            program,
            status,
            progress,
            next_session,
        } = new_client;
        let client = self
            .repository
            .insert_client(ClientDraft {
                user_id: ctx.user_id.clone(),
                name: name.trim().to_string(),
                email,
                phone,
                program,
                notes: String::new(),
                status,
                progress,
                session_count: 0,
                next_session,
                created_at: self.clock.now(),
            })
            .await
            .map_err(|e| ClientWriteFailed::with_debug("create", "new", &e))?;
        info!(client_id = %client.id, "created client");
        Ok(client)
    }

    async fn update_client(
        &self,
        ctx: &SessionContext,
        id: &ClientId,
        patch: ClientPatch,
    ) -> Result<Client, ServerError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(progress) = patch.progress {
            validate_progress(progress)?;
        }
        let mut client = self.find_owned(ctx, id).await?;
        client.apply_patch(patch);
        self.repository
            .update_client(&client)
            .await
            .map_err(|e| ClientWriteFailed::with_debug("update", id.as_str(), &e))
    }

    async fn delete_client(
        &self,
        ctx: &SessionContext,
        id: &ClientId,
    ) -> Result<(), ServerError> {
        self.find_owned(ctx, id).await?;
        self.repository
            .delete_client(id)
            .await
            .map_err(|e| ClientWriteFailed::with_debug("delete", id.as_str(), &e))?;
        info!(client_id = %id, "deleted client");
        Ok(())
    }

    async fn list_notes(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
    ) -> Result<Vec<NoteEntry>, ServerError> {
        let client = self.find_owned(ctx, client_id).await?;
        Ok(self.codec.decode(&client.notes))
    }

    async fn add_note(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        content: &str,
    ) -> Result<Vec<NoteEntry>, ServerError> {
        validate_note(content)?;
        let client = self.find_owned(ctx, client_id).await?;
        let blob = self
            .codec
            .append(&client.notes, content, self.clock.local_now());
        self.write_notes(client_id, &blob).await?;
        debug!(client_id = %client_id, "added note");
        Ok(self.codec.decode(&blob))
    }

    async fn edit_note(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        index: usize,
        content: &str,
    ) -> Result<Vec<NoteEntry>, ServerError> {
        validate_note(content)?;
        let client = self.find_owned(ctx, client_id).await?;
        let blob = self.codec.edit_by_index(&client.notes, index, content)?;
        self.write_notes(client_id, &blob).await?;
        Ok(self.codec.decode(&blob))
    }

    async fn delete_note(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        index: usize,
    ) -> Result<Vec<NoteEntry>, ServerError> {
        let client = self.find_owned(ctx, client_id).await?;
        let blob = self.codec.delete_by_index(&client.notes, index)?;
        self.write_notes(client_id, &blob).await?;
        Ok(self.codec.decode(&blob))
    }

    async fn list_journal(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
    ) -> Result<Vec<NoteRecord>, ServerError> {
        self.find_owned(ctx, client_id).await?;
        self.repository.list_note_records(client_id).await
    }

    async fn add_journal_entry(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        content: &str,
    ) -> Result<NoteRecord, ServerError> {
        validate_note(content)?;
        self.find_owned(ctx, client_id).await?;
        self.repository
            .insert_note_record(NoteDraft {
                client_id: client_id.clone(),
                created_at: self.clock.now(),
                date_stamp: self.codec.stamp(self.clock.local_now()),
                content: content.trim().to_string(),
            })
            .await
    }

    async fn edit_journal_entry(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        note_id: &NoteId,
        content: &str,
    ) -> Result<NoteRecord, ServerError> {
        validate_note(content)?;
        let mut record = self.find_owned_record(ctx, client_id, note_id).await?;
        record.content = content.trim().to_string();
        self.repository.update_note_record(&record).await
    }

    async fn delete_journal_entry(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
        note_id: &NoteId,
    ) -> Result<(), ServerError> {
        let record = self.find_owned_record(ctx, client_id, note_id).await?;
        self.repository.delete_note_record(&record.id).await
    }

    async fn migrate_legacy_notes(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
    ) -> Result<Vec<NoteRecord>, ServerError> {
        let client = self.find_owned(ctx, client_id).await?;
        let entries = self.codec.decode(&client.notes);
        let count = entries.len();
        let parsed: Vec<_> = entries
            .iter()
            .map(|e| {
                self.codec
                    .parse_stamp(&e.date)
                    .and_then(|t| self.clock.to_utc(t))
            })
            .collect();
        let timestamps = migration_timestamps(&parsed, self.clock.now());

        // Oldest first, so stores that order by insertion agree with the
        // timestamps.
        let mut saga = Saga::new("migrate_legacy_notes");
        let mut created = Vec::with_capacity(count);
        for (entry, created_at) in entries.into_iter().zip(timestamps).rev() {
            let draft = NoteDraft {
                client_id: client_id.clone(),
                created_at,
                date_stamp: entry.date,
                content: entry.content,
            };
            match self.repository.insert_note_record(draft).await {
                Ok(record) => {
                    let id = record.id.clone();
                    saga.record(
                        "insert_note_record",
                        async move { self.repository.delete_note_record(&id).await }.boxed(),
                    );
                    created.push(record);
                }
                Err(e) => {
                    return Err(saga
                        .abort(
                            "insert_note_record",
                            NoteMigrationFailed::with_debug(
                                client_id.as_str(),
                                "insert_note_record",
                                &e,
                            ),
                        )
                        .await);
                }
            }
        }

        if let Err(e) = self.repository.update_client_notes(client_id, "").await {
            return Err(saga
                .abort(
                    "clear_notes",
                    NoteMigrationFailed::with_debug(client_id.as_str(), "clear_notes", &e),
                )
                .await);
        }
        saga.commit();
        info!(client_id = %client_id, migrated = count, "migrated legacy notes");

        created.reverse();
        Ok(created)
    }
}

/// Instants for migrated entries, given newest first. Parsed stamps are kept
/// while they stay in order. Any other entry is placed one second before its
/// newer neighbour, but never before the nearest older parsed stamp.
fn migration_timestamps(
    parsed: &[Option<DateTime<Utc>>],
    now: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let mut floors = vec![None; parsed.len()];
    let mut floor = None;
    for (i, t) in parsed.iter().enumerate().rev() {
        floors[i] = floor;
        if t.is_some() {
            floor = *t;
        }
    }

    let mut ceiling = now;
    parsed
        .iter()
        .zip(floors)
        .map(|(t, floor)| {
            let at = match *t {
                Some(t) if t <= ceiling => t,
                _ => {
                    let step = ceiling - Duration::seconds(1);
                    floor.filter(|f| *f <= ceiling).map_or(step, |f| step.max(f))
                }
            };
            ceiling = at;
            at
        })
        .collect()
}
