fn main() {
    env_logger::init();
    bouquet_planner_lib::run_program();
}
