use crate::bridge::Dispatcher;
use incident_core::form::{Draft, Field};
use incident_core::view;
use incident_core::{Action, ViewState};
use leptos::*;
use wasm_bindgen::JsCast;

fn edit_field<E: JsCast + 'static>(store: Dispatcher, field: Field) -> impl Fn(E) + 'static {
    move |ev: E| {
        store.dispatch(Action::FieldChanged {
            field,
            value: event_target_value(&ev),
        })
    }
}

/// Create/edit dialog, rendered only while the store holds a draft.
#[component]
pub fn IncidentForm(state: RwSignal<ViewState>, store: Dispatcher) -> impl IntoView {
    let with_draft = move |f: &dyn Fn(&Draft) -> String| {
        state.with(|s| s.modal.draft().map(f).unwrap_or_default())
    };
    let value = move |field: Field| with_draft(&|d| d.fields.get(field).to_string());
    let locked = move |field: Field| {
        state.with(|s| s.modal.draft().is_some_and(|d| !field.is_editable(&d.mode)))
    };
    let missing = move |field: Field| {
        state.with(|s| s.modal.draft().is_some_and(|d| d.missing.contains(&field)))
    };
    let submitting = move || state.with(|s| s.modal.draft().is_some_and(|d| d.is_submitting()));

    let inputs = Field::FORM_ORDER
        .into_iter()
        .map(move |field| {
            let control = match view::options(field) {
                Some((placeholder, values)) => view! {
                  <select
                    name=field.name()
                    on:change=edit_field(store, field)
                    required=field.is_required()
                    disabled=move || locked(field)
                  >
                    <option value="" selected=move || value(field).is_empty()>{placeholder}</option>
                    {values
                        .into_iter()
                        .map(move |v| view! {
                          <option value=v selected=move || value(field) == v>{v}</option>
                        })
                        .collect_view()}
                  </select>
                }
                .into_view(),
                None if field == Field::Detail => view! {
                  <textarea
                    name=field.name()
                    prop:value=move || value(field)
                    on:input=edit_field(store, field)
                    required=field.is_required()
                  />
                }
                .into_view(),
                None => view! {
                  <input
                    type="text"
                    name=field.name()
                    prop:value=move || value(field)
                    on:input=edit_field(store, field)
                    required=field.is_required()
                    disabled=move || locked(field)
                  />
                }
                .into_view(),
            };
            view! {
              <label class:missing=move || missing(field)>
                {view::field_label(field)} ":" {control}
              </label>
            }
        })
        .collect_view();

    view! {
      <div class="modal">
        <div class="modal-content">
          <h2>{move || with_draft(&|d| view::modal_title(d).to_string())}</h2>
          <form on:submit=move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            store.dispatch(Action::Submit);
          }>
            {inputs}
            <button type="submit" disabled=submitting>
              {move || with_draft(&|d| view::submit_label(d).to_string())}
            </button>
            <button type="button" on:click=move |_| store.dispatch(Action::Cancel)>
              "Cancel"
            </button>
          </form>
        </div>
      </div>
    }
}
