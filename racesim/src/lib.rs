pub mod error;

pub mod core {
    pub mod car;
    pub mod driver;
    pub mod handle_race;
    pub mod lap_model;
    pub mod overtake;
    pub mod qualifying;
    pub mod race;
    pub mod track;
}

pub mod interfaces {
    pub mod presenter_interface;
}

pub mod post {
    pub mod race_result;
}

pub mod pre {
    pub mod read_sim_pars;
    pub mod sim_opts;
}
