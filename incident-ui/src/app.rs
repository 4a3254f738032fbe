use crate::bridge::Dispatcher;
use crate::form::IncidentForm;
use incident_core::view::{self, IncidentRow};
use incident_core::{Action, ClientConfig, HttpIncidentApi, ViewState};
use leptos::*;

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    let state = create_rw_signal(ViewState::new(config.page_size));
    let store = Dispatcher::new(state, HttpIncidentApi::new(config));

    store.dispatch(Action::Mounted);

    view! {
      <div>
        <h1>{view::HEADING}</h1>

        <div class="header">
          <button class="report-button" on:click=move |_| store.dispatch(Action::OpenCreate)>
            "Report"
          </button>
        </div>

        <Show
          when=move || state.with(|s| s.modal.is_open())
          fallback=|| ()
        >
          <IncidentForm state=state store=store/>
        </Show>

        <Show
          when=move || !state.with(|s| s.loading)
          fallback=|| view! { <div class="spinner">{view::LOADING}</div> }
        >
          <IncidentTable state=state store=store/>
        </Show>

        <Footer state=state store=store/>
      </div>
    }
}

#[component]
fn IncidentTable(state: RwSignal<ViewState>, store: Dispatcher) -> impl IntoView {
    let rows = move || {
        state.with(|s| s.incidents.iter().map(IncidentRow::from).collect::<Vec<_>>())
    };

    view! {
      <table border="1" cellpadding="10" cellspacing="0">
        <thead>
          <tr>
            {view::COLUMNS.iter().map(|c| view! { <th>{*c}</th> }).collect_view()}
          </tr>
        </thead>
        <tbody>
          <For
            each=rows
            key=|row| row.clone()
            children=move |row: IncidentRow| {
              let id = row.id;
              view! {
                <tr>
                  {row.cells.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                  <td>
                    <button on:click=move |_| store.dispatch(Action::OpenEdit(id))>"Modify"</button>
                    <button on:click=move |_| store.dispatch(Action::DeleteRequested(id))>"Delete"</button>
                  </td>
                </tr>
              }
            }
          />
        </tbody>
      </table>
    }
}

#[component]
fn Footer(state: RwSignal<ViewState>, store: Dispatcher) -> impl IntoView {
    view! {
      <div class="footer">
        <div>{move || state.with(|s| view::total_label(&s.pagination))}</div>
        <div class="pagination">
          <button
            on:click=move |_| store.dispatch(Action::PreviousPage)
            disabled=move || state.with(|s| !s.pagination.can_previous())
          >
            "Previous"
          </button>
          <span>" " {move || state.with(|s| s.pagination.label())} " "</span>
          <button
            on:click=move |_| store.dispatch(Action::NextPage)
            disabled=move || state.with(|s| !s.pagination.can_next())
          >
            "Next"
          </button>
        </div>
      </div>
    }
}
